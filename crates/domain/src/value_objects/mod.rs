//! Value objects - validated, immutable domain values.

mod actions;
mod names;

pub use actions::{ActionSlot, GameAction, GameActions};
pub use names::{CharacterName, QuarterName};
