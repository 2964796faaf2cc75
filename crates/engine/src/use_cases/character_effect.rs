//! Kill and Steal use case.
//!
//! Both set a deferred effect on a target character; the orchestrator
//! consumes it when that character's turn begins. Last write wins per
//! character per round, since acting order is fixed by rank.

use std::sync::Arc;

use citadels_domain::{Catalog, CharacterEffect, CharacterName, GameAction};

use crate::infrastructure::ports::{
    Keyboard, KeyboardButton, LobbyRepo, MessagingGateway, PlayerRepo,
};

use super::eligibility;
use super::error::{ActionError, IllegalAction};
use super::ActionContext;

pub struct ApplyCharacterEffect {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
}

impl ApplyCharacterEffect {
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

    /// With no target yet, lists valid targets; with a target, applies the
    /// deferred effect and consumes the acting token.
    pub async fn execute(
        &self,
        ctx: ActionContext,
        action: GameAction,
        target: Option<CharacterName>,
    ) -> Result<(), ActionError> {
        let effect = match action {
            GameAction::Kill => CharacterEffect::Killed,
            GameAction::Steal => CharacterEffect::Robbed,
            _ => return Err(IllegalAction::MissingArgument.into()),
        };

        match target {
            None => self.list_targets(ctx, action).await,
            Some(name) => self.apply(ctx, action, effect, name).await,
        }
    }

    fn is_valid_target(&self, ctx: &ActionContext, action: GameAction, name: &CharacterName) -> bool {
        let Ok(def) = self.catalog.character(name) else {
            return false;
        };
        if def.rank <= ctx.character.rank {
            return false;
        }
        // The Thief may never rob the steal-immune character.
        if action == GameAction::Steal && def.immune_to_steal {
            return false;
        }
        true
    }

    async fn list_targets(&self, ctx: ActionContext, action: GameAction) -> Result<(), ActionError> {
        let mut keyboard = Keyboard::new();
        for state in ctx.lobby.character_deck() {
            if !self.is_valid_target(&ctx, action, state.name()) {
                continue;
            }
            let token = format!("{}:{}", action.token(), state.name());
            keyboard = keyboard.row(vec![KeyboardButton::new(state.name().as_str(), token)]);
        }
        if keyboard.is_empty() {
            return Err(IllegalAction::InvalidTarget.into());
        }

        let mut player = ctx.player;
        let prompt = match action {
            GameAction::Kill => "Who do you want to kill?",
            _ => "Who do you want to rob?",
        };
        // The sent keyboard joins the menu bookkeeping so the next
        // refresh_menu can delete it.
        match self
            .gateway
            .send_keyboard(player.chat(), prompt, keyboard)
            .await
        {
            Ok(id) => {
                player.push_menu_message(id);
                self.players
                    .update_menu_messages(player.id(), player.menu_messages())
                    .await?;
            }
            Err(e) => {
                tracing::warn!(player = %player.id(), error = %e, "failed to send target keyboard");
            }
        }
        Ok(())
    }

    async fn apply(
        &self,
        ctx: ActionContext,
        action: GameAction,
        effect: CharacterEffect,
        name: CharacterName,
    ) -> Result<(), ActionError> {
        if !self.is_valid_target(&ctx, action, &name) {
            return Err(IllegalAction::InvalidTarget.into());
        }

        let ActionContext {
            mut lobby,
            mut player,
            character,
        } = ctx;

        let state = lobby
            .character_mut(&name)
            .ok_or(IllegalAction::InvalidTarget)?;
        state.set_effect(effect);
        player.actions_mut().remove(action);

        self.lobbies
            .update_character_deck(lobby.id(), lobby.character_deck())
            .await?;
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
