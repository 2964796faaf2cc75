//! Persistence store ports for the Lobby and Player aggregates.
//!
//! The store provides whole-object saves plus narrowly scoped field
//! updates. Field updates are what action handlers use after a mutation;
//! whole-object saves are reserved for initial setup. The store guarantees
//! read-after-write per key but no cross-key transactions, which is why
//! handlers validate before mutating and never span aggregates in one
//! write.

use async_trait::async_trait;

use citadels_domain::{
    CharacterName, CharacterState, ChatId, GameActions, Lobby, LobbyId, LobbyStatus, MessageId,
    PlacedQuarter, Player, PlayerId, QuarterName,
};

use super::error::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LobbyRepo: Send + Sync {
    async fn get(&self, id: LobbyId) -> Result<Option<Lobby>, RepoError>;
    async fn save(&self, lobby: &Lobby) -> Result<(), RepoError>;

    // Field-level updates
    /// Phase transitions (selection to playing, playing to completed) are
    /// owned by the turn orchestrator's host; action handlers never change
    /// the lobby status themselves.
    async fn update_status(&self, id: LobbyId, status: LobbyStatus) -> Result<(), RepoError>;
    async fn update_card_deck(&self, id: LobbyId, deck: &[QuarterName]) -> Result<(), RepoError>;
    async fn update_character_deck(
        &self,
        id: LobbyId,
        deck: &[CharacterState],
    ) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
    async fn get_by_chat(&self, chat: ChatId) -> Result<Option<Player>, RepoError>;
    async fn list_in_lobby(&self, lobby_id: LobbyId) -> Result<Vec<Player>, RepoError>;
    async fn save(&self, player: &Player) -> Result<(), RepoError>;

    // Field-level updates
    async fn update_coins(&self, id: PlayerId, coins: u32) -> Result<(), RepoError>;
    async fn update_score(&self, id: PlayerId, score: u32) -> Result<(), RepoError>;
    async fn update_character_hand(
        &self,
        id: PlayerId,
        hand: &[CharacterName],
    ) -> Result<(), RepoError>;
    async fn update_quarter_hand(
        &self,
        id: PlayerId,
        hand: &[QuarterName],
    ) -> Result<(), RepoError>;
    async fn update_placed_quarters(
        &self,
        id: PlayerId,
        placed: &[PlacedQuarter],
    ) -> Result<(), RepoError>;
    async fn update_game_actions(
        &self,
        id: PlayerId,
        actions: &GameActions,
    ) -> Result<(), RepoError>;
    async fn update_menu_messages(
        &self,
        id: PlayerId,
        messages: &[MessageId],
    ) -> Result<(), RepoError>;
    async fn update_error_message(
        &self,
        id: PlayerId,
        message: Option<MessageId>,
    ) -> Result<(), RepoError>;
}
