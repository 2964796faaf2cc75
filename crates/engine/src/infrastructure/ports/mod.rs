//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Ports exist for:
//! - The persistence store (Lobby/Player aggregates, field-level updates)
//! - The messaging gateway (best-effort chat I/O)
//! - The turn/phase orchestrator (selection and turn order live elsewhere)
//! - Randomness (deterministic shuffling under test)

mod error;
mod external;
mod repos;
pub mod testing;

pub use error::{GatewayError, OrchestratorError, RepoError};
pub use external::{
    Keyboard, KeyboardButton, MessagingGateway, RandomPort, SelectionStep, TurnOrchestrator,
    TurnStep,
};
pub use repos::{LobbyRepo, PlayerRepo};

#[cfg(test)]
pub use external::{MockMessagingGateway, MockRandomPort, MockTurnOrchestrator};
#[cfg(test)]
pub use repos::{MockLobbyRepo, MockPlayerRepo};
