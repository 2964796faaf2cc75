//! Action resolution errors.

use citadels_domain::{CatalogError, CharacterName, DomainError, QuarterName};

use crate::infrastructure::ports::RepoError;

/// Precondition violations surfaced to the player as a single replaceable
/// inline message. Never fatal.
#[derive(Debug, thiserror::Error)]
pub enum IllegalAction {
    #[error("Unknown action: {0}")]
    UnknownToken(String),
    #[error("That action is not available right now")]
    NotEligible,
    #[error("Character selection is closed")]
    SelectionClosed,
    #[error("{0} has already been taken")]
    CharacterTaken(CharacterName),
    #[error("{0} is already built in your city")]
    AlreadyBuilt(QuarterName),
    #[error("{0} is not in your hand")]
    QuarterNotInHand(QuarterName),
    #[error("Not enough coins")]
    InsufficientCoins,
    #[error("Invalid target")]
    InvalidTarget,
    #[error("Nothing you can afford to destroy")]
    NothingToDestroy,
    #[error("The action needs more input")]
    MissingArgument,
    #[error("The game has already started")]
    GameAlreadyStarted,
    #[error("No players in the lobby")]
    NoPlayers,
}

/// Errors from resolving one action event.
///
/// Gateway and orchestrator failures never appear here: they are logged
/// and swallowed after the mutation committed.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The lobby vanished mid-flight; the player was told "too late".
    #[error("Lobby no longer exists")]
    LobbyGone,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Illegal action: {0}")]
    Illegal(#[from] IllegalAction),
    /// Referenced name absent from the static catalog. Fatal configuration
    /// error, not user-recoverable.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
