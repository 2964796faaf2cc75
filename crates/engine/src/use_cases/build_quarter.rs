//! Build quarter use case.
//!
//! Validates before mutating: a duplicate name, a missing card or a short
//! balance all reject with zero state change. Score is a running ledger,
//! credited `cost + bonus` here and debited on destruction.

use std::sync::Arc;

use citadels_domain::{economy, Catalog, GameAction, GameSettings, QuarterName};

use crate::infrastructure::ports::{LobbyRepo, MessagingGateway, PlayerRepo};

use super::eligibility;
use super::error::{ActionError, IllegalAction};
use super::ActionContext;

pub struct BuildQuarter {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
    settings: GameSettings,
}

impl BuildQuarter {
    pub fn new(
        lobbies: Arc<dyn LobbyRepo>,
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        catalog: Arc<Catalog>,
        settings: GameSettings,
    ) -> Self {
        Self {
            lobbies,
            players,
            gateway,
            catalog,
            settings,
        }
    }

    pub async fn execute(&self, ctx: ActionContext, name: QuarterName) -> Result<(), ActionError> {
        let ActionContext {
            mut lobby,
            mut player,
            character,
        } = ctx;

        let def = self.catalog.quarter(&name)?;
        if player.has_built(&name) {
            return Err(IllegalAction::AlreadyBuilt(name).into());
        }
        if !player.quarter_hand().contains(&name) {
            return Err(IllegalAction::QuarterNotInHand(name).into());
        }
        if player.coins() < def.cost {
            return Err(IllegalAction::InsufficientCoins.into());
        }

        let name = player.take_from_hand(&name)?;
        player.debit_coins(def.cost)?;
        player.add_score(economy::build_score(def));
        player.place_quarter(name, def.bonus)?;

        if let Some(state) = lobby.character_mut(&character.name) {
            state.record_build();
            if state.built_quarters() >= character.build_limit {
                player.actions_mut().remove(GameAction::Build);
            }
        }

        let city = player.city_size();
        let threshold = self.settings.quarters_to_win as usize;
        if city == threshold {
            let others = self.players.list_in_lobby(lobby.id()).await?;
            let bonus = economy::completion_bonus(
                &self.settings,
                others.iter().filter(|p| p.id() != player.id()),
            );
            player.add_score(bonus);
        }

        self.players
            .update_quarter_hand(player.id(), player.quarter_hand())
            .await?;
        self.players.update_coins(player.id(), player.coins()).await?;
        self.players.update_score(player.id(), player.score()).await?;
        self.players
            .update_placed_quarters(player.id(), player.placed_quarters())
            .await?;
        self.players
            .update_game_actions(player.id(), player.actions())
            .await?;
        self.lobbies
            .update_character_deck(lobby.id(), lobby.character_deck())
            .await?;

        if city + 1 == threshold {
            if let Err(e) = self
                .gateway
                .send_message(player.chat(), "One more quarter and your city is complete!")
                .await
            {
                tracing::warn!(player = %player.id(), error = %e, "failed to send progress notice");
            }
        }

        eligibility::refresh_menu(
            &self.players,
            &self.gateway,
            &mut player,
            &character,
            &self.catalog,
        )
        .await
    }
}
