//! Choose character use case.
//!
//! Claims a character during the selection phase and hands control back to
//! the orchestrator to pick the next selector.

use std::sync::Arc;

use citadels_domain::LobbyStatus;

use crate::infrastructure::ports::{
    LobbyRepo, MessagingGateway, PlayerRepo, SelectionStep, TurnOrchestrator,
};

use super::error::{ActionError, IllegalAction};
use super::{fanout, ActionContext};

pub struct ChooseCharacter {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    orchestrator: Arc<dyn TurnOrchestrator>,
}

impl ChooseCharacter {
    pub fn new(
        lobbies: Arc<dyn LobbyRepo>,
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        orchestrator: Arc<dyn TurnOrchestrator>,
    ) -> Self {
        Self {
            lobbies,
            players,
            gateway,
            orchestrator,
        }
    }

    /// The character being claimed is `ctx.character`. A duplicate delivery
    /// of a pick the player already holds is a safe no-op.
    pub async fn execute(&self, ctx: ActionContext) -> Result<(), ActionError> {
        let ActionContext {
            mut lobby,
            mut player,
            character,
        } = ctx;

        if lobby.status() != LobbyStatus::CharacterSelection {
            return Err(IllegalAction::SelectionClosed.into());
        }

        // Duplicate tap: the pick already went through.
        if player.character_hand().contains(&character.name) {
            return Ok(());
        }

        let state = lobby
            .character_mut(&character.name)
            .ok_or(IllegalAction::InvalidTarget)?;
        state
            .select()
            .map_err(|_| IllegalAction::CharacterTaken(character.name.clone()))?;
        player.pick_character(character.name.clone());

        self.players
            .update_character_hand(player.id(), player.character_hand())
            .await?;
        self.lobbies
            .update_character_deck(lobby.id(), lobby.character_deck())
            .await?;

        // Clear the pending selection keyboard before anything new is shown.
        let stale = player.take_menu_messages();
        if !stale.is_empty() {
            fanout::delete_many(self.gateway.as_ref(), player.chat(), stale).await;
            self.players
                .update_menu_messages(player.id(), player.menu_messages())
                .await?;
        }

        match self.orchestrator.request_next_selector(lobby.id()).await {
            Ok(SelectionStep::Selector(next)) => {
                tracing::debug!(lobby = %lobby.id(), player = %next, "next selector chosen");
            }
            Ok(SelectionStep::NoPlayerReady) => {
                tracing::debug!(lobby = %lobby.id(), "no player ready, selection phase moves on");
            }
            Err(e) => {
                tracing::warn!(lobby = %lobby.id(), error = %e, "selector request failed");
            }
        }

        Ok(())
    }
}
