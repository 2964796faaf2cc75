//! Action tokens and the per-player eligibility set.
//!
//! Each player carries an ordered list of [`ActionSlot`]s describing what
//! their current character may still do this turn. A slot is either a single
//! action or a pair of mutually exclusive alternatives sharing one ability
//! (completing either one consumes the whole slot).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// All action kinds a player can request.
///
/// The set is closed: inbound tokens that do not parse into a variant are
/// rejected as illegal instead of silently completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Pick a character during the selection phase.
    ChooseCharacter,
    /// Take coins or draw quarter cards.
    TakeResources,
    /// Build a quarter from hand.
    Build,
    /// Mark a target character as killed (deferred effect).
    Kill,
    /// Mark a target character as robbed (deferred effect).
    Steal,
    /// Swap quarter hands with another player.
    ExchangeHands,
    /// Replace quarters from hand one by one.
    DiscardQuarters,
    /// Destroy a placed quarter of another player.
    Destroy,
    /// Collect revenue from matching placed quarters.
    TakeRevenue,
    /// Finish the turn.
    EndTurn,
}

impl GameAction {
    /// Wire form of the action, used in callback tokens and persistence.
    pub const fn token(&self) -> &'static str {
        match self {
            Self::ChooseCharacter => "choose_character",
            Self::TakeResources => "take_resources",
            Self::Build => "build",
            Self::Kill => "kill",
            Self::Steal => "steal",
            Self::ExchangeHands => "exchange_hands",
            Self::DiscardQuarters => "discard_quarters",
            Self::Destroy => "destroy",
            Self::TakeRevenue => "take_revenue",
            Self::EndTurn => "end_turn",
        }
    }

    /// Human-readable button label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ChooseCharacter => "Choose character",
            Self::TakeResources => "Take resources",
            Self::Build => "Build",
            Self::Kill => "Kill",
            Self::Steal => "Steal",
            Self::ExchangeHands => "Exchange hands",
            Self::DiscardQuarters => "Discard quarters",
            Self::Destroy => "Destroy",
            Self::TakeRevenue => "Take revenue",
            Self::EndTurn => "End turn",
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for GameAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "choose_character" => Ok(Self::ChooseCharacter),
            "take_resources" => Ok(Self::TakeResources),
            "build" => Ok(Self::Build),
            "kill" => Ok(Self::Kill),
            "steal" => Ok(Self::Steal),
            "exchange_hands" => Ok(Self::ExchangeHands),
            "discard_quarters" => Ok(Self::DiscardQuarters),
            "destroy" => Ok(Self::Destroy),
            "take_revenue" => Ok(Self::TakeRevenue),
            "end_turn" => Ok(Self::EndTurn),
            other => Err(DomainError::parse(format!(
                "Unknown action token: {}",
                other
            ))),
        }
    }
}

/// One entry of the eligibility set.
///
/// `OneOf` keeps the "exactly one of two, same slot" semantics of grouped
/// tokens without delimited-string parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSlot {
    Single(GameAction),
    OneOf(GameAction, GameAction),
}

impl ActionSlot {
    /// Whether this slot offers the given action.
    pub fn offers(&self, action: GameAction) -> bool {
        match self {
            Self::Single(a) => *a == action,
            Self::OneOf(a, b) => *a == action || *b == action,
        }
    }

    /// The actions offered by this slot, in display order.
    pub fn actions(&self) -> impl Iterator<Item = GameAction> + '_ {
        let (first, second) = match self {
            Self::Single(a) => (*a, None),
            Self::OneOf(a, b) => (*a, Some(*b)),
        };
        std::iter::once(first).chain(second)
    }
}

/// Ordered eligibility set for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameActions(Vec<ActionSlot>);

impl GameActions {
    pub fn new(slots: Vec<ActionSlot>) -> Self {
        Self(slots)
    }

    pub fn slots(&self) -> &[ActionSlot] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any slot currently offers the given action.
    pub fn offers(&self, action: GameAction) -> bool {
        self.0.iter().any(|slot| slot.offers(action))
    }

    /// Removes the slot offering the given action, grouped slots included.
    ///
    /// Completing either half of a `OneOf` slot consumes the whole slot.
    /// No-op when absent, so duplicate delivery is safe.
    pub fn remove(&mut self, action: GameAction) -> bool {
        let before = self.0.len();
        self.0.retain(|slot| !slot.offers(action));
        before != self.0.len()
    }

    /// Drops every remaining slot (turn is over).
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<ActionSlot>> for GameActions {
    fn from(slots: Vec<ActionSlot>) -> Self {
        Self(slots)
    }
}
