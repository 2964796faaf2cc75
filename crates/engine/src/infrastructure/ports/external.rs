//! External service ports: messaging gateway, turn orchestrator, randomness.

use async_trait::async_trait;

use citadels_domain::{CharacterName, ChatId, LobbyId, MessageId, PlayerId, QuarterName};

use super::error::{GatewayError, OrchestratorError};

// =============================================================================
// Messaging Gateway
// =============================================================================

/// One tappable button: a label and the callback token it submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub label: String,
    pub token: String,
}

impl KeyboardButton {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// An inline keyboard: rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<KeyboardButton>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The messaging gateway delivers UI to players.
///
/// Every operation is best-effort: failures are logged by callers and
/// never escalate to the action mutation's success or failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<MessageId, GatewayError>;

    /// Edits an existing message or sends a fresh one when editing fails
    /// or no previous message exists. Returns the id now carrying the text.
    async fn edit_or_resend(
        &self,
        chat: ChatId,
        message: Option<MessageId>,
        text: &str,
    ) -> Result<MessageId, GatewayError>;

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), GatewayError>;

    async fn send_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<MessageId, GatewayError>;

    /// Shows drawn quarter cards to a player as a media group.
    async fn send_card_images(
        &self,
        chat: ChatId,
        cards: &[QuarterName],
    ) -> Result<(), GatewayError>;
}

// =============================================================================
// Turn Orchestrator
// =============================================================================

/// Outcome of asking for the next character selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep {
    /// This player should pick next.
    Selector(PlayerId),
    /// Nobody is ready to pick; the orchestrator will move the phase on.
    NoPlayerReady,
}

/// Outcome of advancing to the next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStep {
    /// This player acts next with the given character.
    Turn {
        player: PlayerId,
        character: CharacterName,
    },
    /// The round is over; character selection restarts.
    RestartSelection,
}

/// Decides character-selection order and player turn order.
///
/// Invoked by the core only after its own mutation is committed; failures
/// here never corrupt resolver state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TurnOrchestrator: Send + Sync {
    async fn request_next_selector(
        &self,
        lobby_id: LobbyId,
    ) -> Result<SelectionStep, OrchestratorError>;

    async fn advance_turn(&self, lobby_id: LobbyId) -> Result<TurnStep, OrchestratorError>;
}

// =============================================================================
// Randomness
// =============================================================================

/// Randomness injection point so the one-time deck shuffle is
/// deterministic under test.
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    fn shuffle_quarters(&self, deck: &mut Vec<QuarterName>);
}
