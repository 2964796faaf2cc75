//! Infrastructure implementations.
//!
//! Port traits and the concrete adapters owned by this crate (system
//! randomness, configuration loading). Persistence and messaging adapters
//! live with their transports and implement the port traits from here.

pub mod ports;
pub mod random;
pub mod settings;
