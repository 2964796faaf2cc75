//! Discard quarters use case.
//!
//! Repeatable replace-one micro-action: discard a named quarter to the
//! bottom of the pile and draw a replacement from the tail, net hand size
//! unchanged. An explicit "done" (no quarter) consumes the grouped slot.

use std::sync::Arc;

use citadels_domain::{Catalog, GameAction, QuarterName};

use crate::infrastructure::ports::{LobbyRepo, MessagingGateway, PlayerRepo};

use super::eligibility;
use super::error::{ActionError, IllegalAction};
use super::ActionContext;

pub struct DiscardQuarters {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
}

impl DiscardQuarters {
    pub fn new(
        lobbies: Arc<dyn LobbyRepo>,
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            lobbies,
            players,
            gateway,
            catalog,
        }
    }

    pub async fn execute(
        &self,
        ctx: ActionContext,
        quarter: Option<QuarterName>,
    ) -> Result<(), ActionError> {
        let ActionContext {
            mut lobby,
            mut player,
            character,
        } = ctx;

        match quarter {
            Some(name) => {
                if !player.quarter_hand().contains(&name) {
                    return Err(IllegalAction::QuarterNotInHand(name).into());
                }
                let discarded = player.take_from_hand(&name)?;
                lobby.return_to_deck(discarded);
                let drawn = lobby.draw(1);
                player.add_to_hand(drawn.iter().cloned());

                self.lobbies
                    .update_card_deck(lobby.id(), lobby.card_deck())
                    .await?;
                self.players
                    .update_quarter_hand(player.id(), player.quarter_hand())
                    .await?;

                if !drawn.is_empty() {
                    if let Err(e) = self.gateway.send_card_images(player.chat(), &drawn).await {
                        tracing::warn!(player = %player.id(), error = %e, "failed to show replacement card");
                    }
                }
                Ok(())
            }
            // "Done": the grouped slot is spent.
            None => {
                player.actions_mut().remove(GameAction::DiscardQuarters);
                self.players
                    .update_game_actions(player.id(), player.actions())
                    .await?;
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
    }
}
