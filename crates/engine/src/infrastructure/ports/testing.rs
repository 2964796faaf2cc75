//! In-memory fakes for resolver-level tests.
//!
//! Unlike the automocks, these keep real state between calls, so a test can
//! drive a whole action through fetch, mutate and re-fetch.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use citadels_domain::{
    CharacterName, CharacterState, ChatId, GameActions, Lobby, LobbyId, LobbyStatus, MessageId,
    PlacedQuarter, Player, PlayerId, QuarterName,
};

use super::error::RepoError;
use super::repos::{LobbyRepo, PlayerRepo};

/// Serde-backed field update against a stored aggregate.
///
/// The real store patches single fields; the fake re-serializes the whole
/// aggregate, which preserves the same observable behavior.
#[derive(Default)]
pub struct InMemoryLobbyRepo {
    lobbies: RwLock<HashMap<LobbyId, Lobby>>,
}

impl InMemoryLobbyRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, lobby: Lobby) {
        self.lobbies.write().await.insert(lobby.id(), lobby);
    }

    async fn patch(
        &self,
        id: LobbyId,
        operation: &'static str,
        f: impl FnOnce(&mut serde_json::Value),
    ) -> Result<(), RepoError> {
        let mut lobbies = self.lobbies.write().await;
        let lobby = lobbies
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Lobby", id))?;
        let mut value = serde_json::to_value(&*lobby).map_err(RepoError::serialization)?;
        f(&mut value);
        *lobby = serde_json::from_value(value).map_err(|e| RepoError::store(operation, e))?;
        Ok(())
    }
}

#[async_trait]
impl LobbyRepo for InMemoryLobbyRepo {
    async fn get(&self, id: LobbyId) -> Result<Option<Lobby>, RepoError> {
        Ok(self.lobbies.read().await.get(&id).cloned())
    }

    async fn save(&self, lobby: &Lobby) -> Result<(), RepoError> {
        self.lobbies.write().await.insert(lobby.id(), lobby.clone());
        Ok(())
    }

    async fn update_status(&self, id: LobbyId, status: LobbyStatus) -> Result<(), RepoError> {
        let status = serde_json::to_value(status).map_err(RepoError::serialization)?;
        self.patch(id, "update_status", |v| v["status"] = status).await
    }

    async fn update_card_deck(&self, id: LobbyId, deck: &[QuarterName]) -> Result<(), RepoError> {
        let deck = serde_json::to_value(deck).map_err(RepoError::serialization)?;
        self.patch(id, "update_card_deck", |v| v["card_deck"] = deck)
            .await
    }

    async fn update_character_deck(
        &self,
        id: LobbyId,
        deck: &[CharacterState],
    ) -> Result<(), RepoError> {
        let deck = serde_json::to_value(deck).map_err(RepoError::serialization)?;
        self.patch(id, "update_character_deck", |v| v["character_deck"] = deck)
            .await
    }
}

#[derive(Default)]
pub struct InMemoryPlayerRepo {
    players: RwLock<HashMap<PlayerId, Player>>,
}

impl InMemoryPlayerRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, player: Player) {
        self.players.write().await.insert(player.id(), player);
    }

    async fn patch(
        &self,
        id: PlayerId,
        operation: &'static str,
        f: impl FnOnce(&mut serde_json::Value),
    ) -> Result<(), RepoError> {
        let mut players = self.players.write().await;
        let player = players
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Player", id))?;
        let mut value = serde_json::to_value(&*player).map_err(RepoError::serialization)?;
        f(&mut value);
        *player = serde_json::from_value(value).map_err(|e| RepoError::store(operation, e))?;
        Ok(())
    }
}

#[async_trait]
impl PlayerRepo for InMemoryPlayerRepo {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        Ok(self.players.read().await.get(&id).cloned())
    }

    async fn get_by_chat(&self, chat: ChatId) -> Result<Option<Player>, RepoError> {
        Ok(self
            .players
            .read()
            .await
            .values()
            .find(|p| p.chat() == chat)
            .cloned())
    }

    async fn list_in_lobby(&self, lobby_id: LobbyId) -> Result<Vec<Player>, RepoError> {
        Ok(self
            .players
            .read()
            .await
            .values()
            .filter(|p| p.lobby_id() == lobby_id)
            .cloned()
            .collect())
    }

    async fn save(&self, player: &Player) -> Result<(), RepoError> {
        self.players
            .write()
            .await
            .insert(player.id(), player.clone());
        Ok(())
    }

    async fn update_coins(&self, id: PlayerId, coins: u32) -> Result<(), RepoError> {
        self.patch(id, "update_coins", |v| v["coins"] = coins.into())
            .await
    }

    async fn update_score(&self, id: PlayerId, score: u32) -> Result<(), RepoError> {
        self.patch(id, "update_score", |v| v["score"] = score.into())
            .await
    }

    async fn update_character_hand(
        &self,
        id: PlayerId,
        hand: &[CharacterName],
    ) -> Result<(), RepoError> {
        let hand = serde_json::to_value(hand).map_err(RepoError::serialization)?;
        self.patch(id, "update_character_hand", |v| v["character_hand"] = hand)
            .await
    }

    async fn update_quarter_hand(
        &self,
        id: PlayerId,
        hand: &[QuarterName],
    ) -> Result<(), RepoError> {
        let hand = serde_json::to_value(hand).map_err(RepoError::serialization)?;
        self.patch(id, "update_quarter_hand", |v| v["quarter_hand"] = hand)
            .await
    }

    async fn update_placed_quarters(
        &self,
        id: PlayerId,
        placed: &[PlacedQuarter],
    ) -> Result<(), RepoError> {
        let placed = serde_json::to_value(placed).map_err(RepoError::serialization)?;
        self.patch(id, "update_placed_quarters", |v| v["placed_quarters"] = placed)
            .await
    }

    async fn update_game_actions(
        &self,
        id: PlayerId,
        actions: &GameActions,
    ) -> Result<(), RepoError> {
        let actions = serde_json::to_value(actions).map_err(RepoError::serialization)?;
        self.patch(id, "update_game_actions", |v| v["game_actions"] = actions)
            .await
    }

    async fn update_menu_messages(
        &self,
        id: PlayerId,
        messages: &[MessageId],
    ) -> Result<(), RepoError> {
        let messages = serde_json::to_value(messages).map_err(RepoError::serialization)?;
        self.patch(id, "update_menu_messages", |v| v["menu_messages"] = messages)
            .await
    }

    async fn update_error_message(
        &self,
        id: PlayerId,
        message: Option<MessageId>,
    ) -> Result<(), RepoError> {
        let message = serde_json::to_value(message).map_err(RepoError::serialization)?;
        self.patch(id, "update_error_message", |v| v["error_message"] = message)
            .await
    }
}
