//! Shared fixtures for use case tests.

use chrono::Utc;
use citadels_domain::{
    Catalog, CharacterDef, CharacterName, CharacterState, ChatId, GameSettings, Lobby, Player,
    QuarterColor, QuarterDef, QuarterName, ResourcePerk, RevenueRule,
};

use super::ActionContext;

pub(crate) fn cname(s: &str) -> CharacterName {
    CharacterName::new(s).expect("valid character name")
}

pub(crate) fn quarter(s: &str) -> QuarterName {
    QuarterName::new(s).expect("valid quarter name")
}

fn character_def(
    name: &str,
    rank: u8,
    color: Option<QuarterColor>,
    build_limit: u8,
    resource_perk: Option<ResourcePerk>,
    revenue: Option<RevenueRule>,
    immune_to_steal: bool,
) -> CharacterDef {
    CharacterDef {
        name: cname(name),
        rank,
        color,
        build_limit,
        resource_perk,
        revenue,
        immune_to_steal,
    }
}

fn quarter_def(name: &str, cost: u32, color: QuarterColor, bonus: u32, copies: u32) -> QuarterDef {
    QuarterDef {
        name: quarter(name),
        cost,
        color,
        bonus,
        copies,
    }
}

pub(crate) fn catalog() -> Catalog {
    Catalog::new(
        vec![
            character_def("Assassin", 1, None, 1, None, None, false),
            character_def("Thief", 2, None, 1, None, None, false),
            character_def("Magician", 3, None, 1, None, None, false),
            character_def(
                "King",
                4,
                Some(QuarterColor::Yellow),
                1,
                None,
                Some(RevenueRule::MatchingColor),
                false,
            ),
            character_def(
                "Merchant",
                6,
                Some(QuarterColor::Green),
                1,
                Some(ResourcePerk::BonusCoinsOnCardTake),
                Some(RevenueRule::MatchingColor),
                false,
            ),
            character_def(
                "Architect",
                7,
                None,
                3,
                Some(ResourcePerk::BonusCardsOnCoinTake),
                None,
                false,
            ),
            character_def(
                "Warlord",
                8,
                Some(QuarterColor::Red),
                1,
                None,
                Some(RevenueRule::MatchingColor),
                false,
            ),
            character_def("Beggar", 9, None, 1, None, Some(RevenueRule::CheapQuarters), true),
        ],
        vec![
            quarter_def("Tavern", 1, QuarterColor::Green, 0, 3),
            quarter_def("Market", 2, QuarterColor::Green, 0, 1),
            quarter_def("Keep", 3, QuarterColor::Red, 0, 1),
            quarter_def("Castle", 4, QuarterColor::Yellow, 0, 1),
            quarter_def("Cathedral", 5, QuarterColor::Blue, 0, 1),
            quarter_def("Dragon Gate", 6, QuarterColor::Purple, 2, 1),
        ],
    )
    .expect("valid fixture catalog")
}

pub(crate) fn settings() -> GameSettings {
    GameSettings::default()
}

pub(crate) fn character(catalog: &Catalog, name: &str) -> CharacterDef {
    catalog.character(&cname(name)).expect("in catalog").clone()
}

/// A lobby in CharacterSelection with a small pre-shuffled pile and one
/// character-state entry per fixture character.
pub(crate) fn lobby_in_selection() -> Lobby {
    let mut lobby = Lobby::new(ChatId::new(-1000), Utc::now());
    let character_deck = catalog()
        .characters()
        .iter()
        .map(|def| CharacterState::new(def.name.clone()))
        .collect();
    lobby
        .begin_selection(
            vec![
                quarter("Tavern"),
                quarter("Market"),
                quarter("Keep"),
                quarter("Castle"),
                quarter("Cathedral"),
            ],
            character_deck,
        )
        .expect("fresh lobby");
    lobby
}

pub(crate) fn lobby_in_play() -> Lobby {
    let mut lobby = lobby_in_selection();
    lobby.begin_play().expect("selection in progress");
    lobby
}

pub(crate) fn player_in(lobby: &Lobby) -> Player {
    player_with_chat(lobby, 100)
}

pub(crate) fn player_with_chat(lobby: &Lobby, chat: i64) -> Player {
    Player::new(lobby.id(), ChatId::new(chat), Utc::now())
}

pub(crate) fn ctx(lobby: Lobby, player: Player, character: CharacterDef) -> ActionContext {
    ActionContext {
        lobby,
        player,
        character,
    }
}
