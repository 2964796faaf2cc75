//! Economy engine - pure arithmetic over catalog and player state.
//!
//! Everything here is deterministic and free of I/O so the rules can be
//! exercised in tests without messaging or persistence.

use crate::aggregates::Player;
use crate::catalog::{Catalog, CatalogError, CharacterDef, GameSettings, QuarterDef, RevenueRule};
use crate::value_objects::QuarterName;

/// Score credited when a quarter is built: cost plus catalog bonus.
pub fn build_score(def: &QuarterDef) -> u32 {
    def.cost + def.bonus
}

/// Coins the destroyer pays: one less than the build cost.
///
/// A cost-1 quarter is therefore destroyed for free. This is deliberate:
/// the affordability rule (`cost <= coins + 1`) already admits it, and a
/// special floor would make the cheapest buildings the only indestructible
/// ones.
pub fn destroy_cost(def: &QuarterDef) -> u32 {
    def.cost.saturating_sub(1)
}

/// Full score value of a placed quarter: catalog cost plus the bonus that
/// was granted at build time.
pub fn placed_value(def: &QuarterDef, instance_bonus: u32) -> u32 {
    def.cost + instance_bonus
}

/// Flat coin award for a character with the card-take perk (Merchant).
pub fn card_take_bonus_coins(settings: &GameSettings) -> u32 {
    settings.coins_per_turn / 2
}

/// Extra cards drawn by a character with the coin-take perk (Architect).
pub fn coin_take_bonus_cards(settings: &GameSettings) -> u32 {
    2 * settings.quarters_per_turn
}

/// Revenue a character collects from the player's placed quarters.
///
/// Color-bearing characters earn one coin per placed quarter of their
/// color; the cheap-quarters rule (Beggar) earns one per quarter costing
/// exactly 1. Characters without a revenue rule earn nothing.
pub fn revenue(
    player: &Player,
    character: &CharacterDef,
    catalog: &Catalog,
) -> Result<u32, CatalogError> {
    let Some(rule) = character.revenue else {
        return Ok(0);
    };

    let mut total = 0;
    for placed in player.placed_quarters() {
        let def = catalog.quarter(&placed.name)?;
        let earns = match rule {
            RevenueRule::MatchingColor => character.color == Some(def.color),
            RevenueRule::CheapQuarters => def.cost == 1,
        };
        if earns {
            total += 1;
        }
    }
    Ok(total)
}

/// City-completion bonus for a player who just reached the threshold.
///
/// Doubled when no other player already has a completed city; a tie where
/// someone else is at or above the threshold forfeits the doubling.
pub fn completion_bonus<'a>(
    settings: &GameSettings,
    others: impl IntoIterator<Item = &'a Player>,
) -> u32 {
    let someone_finished = others
        .into_iter()
        .any(|p| p.city_size() >= settings.quarters_to_win as usize);
    if someone_finished {
        settings.full_build_bonus
    } else {
        settings.full_build_bonus * 2
    }
}

/// Whether the player holds any affordable, not-yet-built quarter.
///
/// Drives suppression of the Build button; never persisted.
pub fn can_build_any(player: &Player, catalog: &Catalog) -> Result<bool, CatalogError> {
    for name in player.quarter_hand() {
        let def = catalog.quarter(name)?;
        if def.cost <= player.coins() && !player.has_built(name) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Placed quarters of `target` the actor can afford to destroy, with the
/// coins the destruction would cost.
///
/// A completed city is permanently protected: once the target has reached
/// `quarters_to_win` placed quarters, nothing of theirs is ever listed.
pub fn destroy_candidates(
    target: &Player,
    actor_coins: u32,
    catalog: &Catalog,
    settings: &GameSettings,
) -> Result<Vec<(QuarterName, u32)>, CatalogError> {
    if target.city_size() >= settings.quarters_to_win as usize {
        return Ok(Vec::new());
    }

    let mut candidates = Vec::new();
    for placed in target.placed_quarters() {
        let def = catalog.quarter(&placed.name)?;
        if def.cost <= actor_coins + 1 {
            candidates.push((placed.name.clone(), destroy_cost(def)));
        }
    }
    Ok(candidates)
}
