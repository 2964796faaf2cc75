//! Aggregates - Lobby and Player, independently persisted and keyed.
//!
//! A Player references its Lobby by id only. The two aggregates are fetched
//! separately before each action and updated with targeted field writes, so
//! there are no cross-aggregate read-modify-write races.

pub mod lobby;
pub mod player;

pub use lobby::{CharacterEffect, CharacterState, CharacterStatus, Lobby, LobbyStatus};
pub use player::{PlacedQuarter, Player};
