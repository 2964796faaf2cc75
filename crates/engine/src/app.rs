//! Composition root.
//!
//! Adapters for the persistence ports, the messaging gateway and the turn
//! orchestrator are injected by the hosting binary; everything else is
//! wired here from the loaded catalog and settings.

use std::sync::Arc;

use citadels_domain::{Catalog, GameSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::infrastructure::ports::{LobbyRepo, MessagingGateway, PlayerRepo, TurnOrchestrator};
use crate::infrastructure::random::SystemRandom;
use crate::use_cases::resolver::ActionResolver;
use crate::use_cases::setup_game::SetupGame;

/// The persistence side of the engine, injected as trait objects.
pub struct Repositories {
    pub lobbies: Arc<dyn LobbyRepo>,
    pub players: Arc<dyn PlayerRepo>,
}

/// Fully wired engine. Cheap to clone handles out of; the hosting event
/// loop calls `resolver` per inbound event and `setup_game` on game start.
pub struct App {
    pub resolver: Arc<ActionResolver>,
    pub setup_game: Arc<SetupGame>,
}

impl App {
    pub fn new(
        repositories: Repositories,
        gateway: Arc<dyn MessagingGateway>,
        orchestrator: Arc<dyn TurnOrchestrator>,
        catalog: Catalog,
        settings: GameSettings,
    ) -> Self {
        let Repositories { lobbies, players } = repositories;
        let catalog = Arc::new(catalog);

        let resolver = Arc::new(ActionResolver::new(
            Arc::clone(&lobbies),
            Arc::clone(&players),
            Arc::clone(&gateway),
            Arc::clone(&orchestrator),
            Arc::clone(&catalog),
            settings.clone(),
        ));
        let setup_game = Arc::new(SetupGame::new(
            lobbies,
            players,
            gateway,
            orchestrator,
            Arc::new(SystemRandom),
            catalog,
            settings,
        ));

        Self {
            resolver,
            setup_game,
        }
    }
}

/// Initializes the tracing subscriber. Call once at startup; a `RUST_LOG`
/// value in the environment overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citadels_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
