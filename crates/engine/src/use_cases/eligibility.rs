//! Eligibility rendering.
//!
//! Turns a player's persisted action slots into keyboard rows. Suppression
//! is a pure function of current player and character state and is never
//! persisted: a suppressed action stays in the eligibility set, it just is
//! not offered right now.

use std::sync::Arc;

use citadels_domain::{economy, Catalog, CatalogError, CharacterDef, GameAction, Player};

use crate::infrastructure::ports::{Keyboard, KeyboardButton, MessagingGateway, PlayerRepo};

use super::error::ActionError;
use super::fanout;

/// Renders the player's current action slots as keyboard rows.
///
/// - `TakeRevenue` is hidden while the computed revenue is 0.
/// - `Build` is hidden while no held quarter is both affordable and new.
///
/// Grouped slots render as one two-button row; a fully suppressed slot
/// produces no row at all.
pub fn render_keyboard(
    player: &Player,
    character: &CharacterDef,
    catalog: &Catalog,
) -> Result<Keyboard, CatalogError> {
    let mut keyboard = Keyboard::new();
    for slot in player.actions().slots() {
        let mut row = Vec::new();
        for action in slot.actions() {
            if suppressed(action, player, character, catalog)? {
                continue;
            }
            row.push(KeyboardButton::new(action.label(), action.token()));
        }
        keyboard = keyboard.row(row);
    }
    Ok(keyboard)
}

fn suppressed(
    action: GameAction,
    player: &Player,
    character: &CharacterDef,
    catalog: &Catalog,
) -> Result<bool, CatalogError> {
    match action {
        GameAction::TakeRevenue => Ok(economy::revenue(player, character, catalog)? == 0),
        GameAction::Build => Ok(!economy::can_build_any(player, catalog)?),
        _ => Ok(false),
    }
}

/// Replaces the player's pending menu with a freshly rendered one.
///
/// Stale menus are deleted and the bookkeeping persisted before the new
/// keyboard is issued, so a tap on an old keyboard cannot race a new one.
/// Gateway failures are logged and swallowed; repo failures propagate.
pub async fn refresh_menu(
    players: &Arc<dyn PlayerRepo>,
    gateway: &Arc<dyn MessagingGateway>,
    player: &mut Player,
    character: &CharacterDef,
    catalog: &Catalog,
) -> Result<(), ActionError> {
    let stale = player.take_menu_messages();
    if !stale.is_empty() {
        fanout::delete_many(gateway.as_ref(), player.chat(), stale).await;
        players
            .update_menu_messages(player.id(), player.menu_messages())
            .await?;
    }

    let keyboard = render_keyboard(player, character, catalog)?;
    if keyboard.is_empty() {
        return Ok(());
    }

    match gateway
        .send_keyboard(player.chat(), "Your move", keyboard)
        .await
    {
        Ok(id) => {
            player.push_menu_message(id);
            players
                .update_menu_messages(player.id(), player.menu_messages())
                .await?;
        }
        Err(e) => {
            tracing::warn!(player = %player.id(), error = %e, "failed to send action keyboard");
        }
    }
    Ok(())
}
