//! Game setup use case.
//!
//! Builds the draw pile from catalog copies, shuffles it exactly once,
//! deals starting coins and quarters, and opens character selection. The
//! only whole-object saves in the engine happen here.

use std::sync::Arc;

use citadels_domain::{
    ActionSlot, Catalog, CharacterState, GameAction, GameActions, GameSettings, LobbyId,
};

use crate::infrastructure::ports::{
    LobbyRepo, MessagingGateway, PlayerRepo, RandomPort, SelectionStep, TurnOrchestrator,
};

use super::error::{ActionError, IllegalAction};

pub struct SetupGame {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    orchestrator: Arc<dyn TurnOrchestrator>,
    random: Arc<dyn RandomPort>,
    catalog: Arc<Catalog>,
    settings: GameSettings,
}

impl SetupGame {
    pub fn new(
        lobbies: Arc<dyn LobbyRepo>,
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        orchestrator: Arc<dyn TurnOrchestrator>,
        random: Arc<dyn RandomPort>,
        catalog: Arc<Catalog>,
        settings: GameSettings,
    ) -> Self {
        Self {
            lobbies,
            players,
            gateway,
            orchestrator,
            random,
            catalog,
            settings,
        }
    }

    pub async fn execute(&self, lobby_id: LobbyId) -> Result<(), ActionError> {
        let mut lobby = self
            .lobbies
            .get(lobby_id)
            .await?
            .ok_or(ActionError::LobbyGone)?;
        if lobby.status() != citadels_domain::LobbyStatus::Configuring {
            return Err(IllegalAction::GameAlreadyStarted.into());
        }

        let mut roster = self.players.list_in_lobby(lobby_id).await?;
        if roster.is_empty() {
            return Err(IllegalAction::NoPlayers.into());
        }

        let mut card_deck = Vec::new();
        for def in self.catalog.quarters() {
            for _ in 0..def.copies {
                card_deck.push(def.name.clone());
            }
        }
        self.random.shuffle_quarters(&mut card_deck);

        let character_deck = self
            .catalog
            .characters()
            .iter()
            .map(|def| CharacterState::new(def.name.clone()))
            .collect();

        lobby.begin_selection(card_deck, character_deck)?;

        for player in &mut roster {
            player.credit_coins(self.settings.starting_coins);
            let hand = lobby.draw(self.settings.starting_quarters as usize);
            player.add_to_hand(hand);
            player.set_actions(GameActions::new(vec![ActionSlot::Single(
                GameAction::ChooseCharacter,
            )]));
        }

        self.lobbies.save(&lobby).await?;
        for player in &roster {
            self.players.save(player).await?;
        }

        if let Err(e) = self
            .gateway
            .send_message(lobby.group_chat(), "The game begins! Pick your characters.")
            .await
        {
            tracing::warn!(lobby = %lobby.id(), error = %e, "failed to announce game start");
        }

        match self.orchestrator.request_next_selector(lobby.id()).await {
            Ok(SelectionStep::Selector(first)) => {
                tracing::debug!(lobby = %lobby.id(), player = %first, "first selector chosen");
            }
            Ok(SelectionStep::NoPlayerReady) => {
                tracing::debug!(lobby = %lobby.id(), "no player ready at game start");
            }
            Err(e) => {
                tracing::warn!(lobby = %lobby.id(), error = %e, "selector request failed");
            }
        }

        Ok(())
    }
}
