//! Exchange hands use case.
//!
//! Full quarter-hand swap with a chosen player. Consumes the grouped
//! exchange/discard slot, so the discard alternative is gone afterwards.

use std::sync::Arc;

use citadels_domain::{Catalog, GameAction, PlayerId};

use crate::infrastructure::ports::{MessagingGateway, PlayerRepo};

use super::eligibility;
use super::error::{ActionError, IllegalAction};
use super::ActionContext;

pub struct ExchangeHands {
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
}

impl ExchangeHands {
    pub fn new(
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            players,
            gateway,
            catalog,
        }
    }

    pub async fn execute(&self, ctx: ActionContext, target_id: PlayerId) -> Result<(), ActionError> {
        let ActionContext {
            lobby,
            mut player,
            character,
        } = ctx;

        if target_id == player.id() {
            return Err(IllegalAction::InvalidTarget.into());
        }
        let mut target = self
            .players
            .get(target_id)
            .await?
            .ok_or(IllegalAction::InvalidTarget)?;
        if target.lobby_id() != lobby.id() {
            return Err(IllegalAction::InvalidTarget.into());
        }

        let own = player.replace_hand(target.quarter_hand().to_vec());
        target.replace_hand(own);
        player.actions_mut().remove(GameAction::ExchangeHands);

        self.players
            .update_quarter_hand(player.id(), player.quarter_hand())
            .await?;
        self.players
            .update_quarter_hand(target.id(), target.quarter_hand())
            .await?;
        self.players
            .update_game_actions(player.id(), player.actions())
            .await?;

        if let Err(e) = self
            .gateway
            .send_message(target.chat(), "Your hand was exchanged by the Magician!")
            .await
        {
            tracing::warn!(player = %target.id(), error = %e, "failed to notify exchange target");
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
