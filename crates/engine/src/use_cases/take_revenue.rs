//! Take revenue use case.
//!
//! Revenue is computed at render time for suppression and recomputed here
//! at click time from persisted state, so a stale button never pays out a
//! stale amount.

use std::sync::Arc;

use citadels_domain::{economy, Catalog, GameAction};

use crate::infrastructure::ports::{MessagingGateway, PlayerRepo};

use super::eligibility;
use super::error::ActionError;
use super::ActionContext;

pub struct TakeRevenue {
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
}

impl TakeRevenue {
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

    pub async fn execute(&self, ctx: ActionContext) -> Result<(), ActionError> {
        let ActionContext {
            lobby: _,
            mut player,
            character,
        } = ctx;

        let amount = economy::revenue(&player, &character, &self.catalog)?;
        player.credit_coins(amount);
        player.actions_mut().remove(GameAction::TakeRevenue);

        self.players.update_coins(player.id(), player.coins()).await?;
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
