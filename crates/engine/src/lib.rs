//! Citadels engine - the action resolution core.
//!
//! Every inbound UI event is an independent unit of work: the resolver
//! fetches the player and lobby aggregates, validates the requested action
//! against the player's eligibility set, applies the mutation through
//! targeted field updates, and only then emits gateway/orchestrator side
//! effects. All cross-event state lives behind the persistence ports.

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::{init_tracing, App, Repositories};
pub use infrastructure::settings::{load_catalog, EngineConfig};
pub use use_cases::resolver::{ActionArgs, ActionRequest, ActionResolver, PlayerRef};
pub use use_cases::setup_game::SetupGame;
pub use use_cases::take_resources::ResourceKind;
