//! Action use cases.
//!
//! One use case struct per action kind, built once at startup and
//! dispatched to by the [`resolver`]. Handlers validate before mutating,
//! mutate via targeted field updates, then emit best-effort side effects.

use citadels_domain::{CharacterDef, Lobby, Player};

pub mod build_quarter;
pub mod character_effect;
pub mod choose_character;
pub mod destroy_quarters;
pub mod discard_quarters;
pub mod eligibility;
pub mod end_turn;
pub mod error;
pub mod exchange_hands;
pub mod fanout;
pub mod resolver;
pub mod setup_game;
pub mod take_resources;
pub mod take_revenue;

#[cfg(test)]
pub(crate) mod fixtures;

/// The state a handler acts on: both aggregates plus the acting
/// character's immutable definition, joined by the resolver at entry.
///
/// Stored records never carry live catalog references; the join happens
/// here, once, and handlers receive the pair.
pub struct ActionContext {
    pub lobby: Lobby,
    pub player: Player,
    pub character: CharacterDef,
}
