//! End turn use case.
//!
//! Hides the acting character from later rounds, clears the player's
//! remaining eligibility and hands control to the orchestrator. The
//! mutation is committed before the orchestrator is reached, so its
//! failure never corrupts the finished turn.

use std::sync::Arc;

use crate::infrastructure::ports::{
    LobbyRepo, MessagingGateway, PlayerRepo, TurnOrchestrator, TurnStep,
};

use super::error::ActionError;
use super::{fanout, ActionContext};

pub struct EndTurn {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    orchestrator: Arc<dyn TurnOrchestrator>,
}

impl EndTurn {
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

    pub async fn execute(&self, ctx: ActionContext) -> Result<(), ActionError> {
        let ActionContext {
            mut lobby,
            mut player,
            character,
        } = ctx;

        if let Some(state) = lobby.character_mut(&character.name) {
            state.secretly_remove();
        }
        player.actions_mut().clear();

        self.lobbies
            .update_character_deck(lobby.id(), lobby.character_deck())
            .await?;
        self.players
            .update_game_actions(player.id(), player.actions())
            .await?;

        let stale = player.take_menu_messages();
        if !stale.is_empty() {
            fanout::delete_many(self.gateway.as_ref(), player.chat(), stale).await;
            self.players
                .update_menu_messages(player.id(), player.menu_messages())
                .await?;
        }

        match self.orchestrator.advance_turn(lobby.id()).await {
            Ok(TurnStep::Turn { player, character }) => {
                tracing::debug!(lobby = %lobby.id(), %player, %character, "next turn begins");
            }
            Ok(TurnStep::RestartSelection) => {
                tracing::debug!(lobby = %lobby.id(), "round over, selection restarts");
            }
            Err(e) => {
                tracing::warn!(lobby = %lobby.id(), error = %e, "turn advance failed");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockLobbyRepo, MockMessagingGateway, MockPlayerRepo, MockTurnOrchestrator,
        OrchestratorError,
    };
    use crate::use_cases::fixtures;
    use citadels_domain::{ActionSlot, CharacterStatus, GameAction, GameActions, MessageId};

    #[tokio::test]
    async fn hides_character_and_clears_eligibility() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.set_actions(GameActions::new(vec![ActionSlot::Single(
            GameAction::EndTurn,
        )]));
        player.push_menu_message(MessageId::new(11));
        let king = fixtures::character(&catalog, "King");

        let mut lobbies = MockLobbyRepo::new();
        lobbies
            .expect_update_character_deck()
            .withf(|_, deck| {
                deck.iter().any(|c| {
                    c.name().as_str() == "King"
                        && c.status() == CharacterStatus::SecretlyRemoved
                })
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut players = MockPlayerRepo::new();
        players
            .expect_update_game_actions()
            .withf(|_, actions| actions.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_menu_messages()
            .withf(|_, messages| messages.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut gateway = MockMessagingGateway::new();
        gateway.expect_delete_message().times(1).returning(|_, _| Ok(()));

        let mut orchestrator = MockTurnOrchestrator::new();
        orchestrator
            .expect_advance_turn()
            .times(1)
            .returning(|_| Ok(TurnStep::RestartSelection));

        let use_case = EndTurn::new(
            Arc::new(lobbies),
            Arc::new(players),
            Arc::new(gateway),
            Arc::new(orchestrator),
        );
        use_case
            .execute(fixtures::ctx(lobby, player, king))
            .await
            .expect("end turn succeeds");
    }

    #[tokio::test]
    async fn orchestrator_failure_is_swallowed() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let player = fixtures::player_in(&lobby);
        let king = fixtures::character(&catalog, "King");

        let mut lobbies = MockLobbyRepo::new();
        lobbies
            .expect_update_character_deck()
            .returning(|_, _| Ok(()));
        let mut players = MockPlayerRepo::new();
        players
            .expect_update_game_actions()
            .returning(|_, _| Ok(()));

        let mut orchestrator = MockTurnOrchestrator::new();
        orchestrator
            .expect_advance_turn()
            .returning(|_| Err(OrchestratorError::Unavailable("down".into())));

        let use_case = EndTurn::new(
            Arc::new(lobbies),
            Arc::new(players),
            Arc::new(MockMessagingGateway::new()),
            Arc::new(orchestrator),
        );
        use_case
            .execute(fixtures::ctx(lobby, player, king))
            .await
            .expect("orchestrator failure never fails the committed turn end");
    }
}
