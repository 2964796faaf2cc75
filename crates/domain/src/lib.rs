//! Pure domain layer: aggregates, value objects, catalog definitions and
//! game arithmetic. Synchronous and free of I/O so every rule is testable
//! in isolation.

pub mod aggregates;
pub mod catalog;
pub mod economy;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    CharacterEffect, CharacterState, CharacterStatus, Lobby, LobbyStatus, PlacedQuarter, Player,
};
pub use catalog::{
    Catalog, CatalogError, CharacterDef, GameSettings, QuarterColor, QuarterDef, ResourcePerk,
    RevenueRule,
};
pub use error::DomainError;
pub use ids::{ChatId, LobbyId, MessageId, PlayerId};
pub use value_objects::{ActionSlot, CharacterName, GameAction, GameActions, QuarterName};
