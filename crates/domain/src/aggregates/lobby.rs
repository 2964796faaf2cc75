//! Lobby aggregate - the shared per-game state.
//!
//! # Invariants
//!
//! - The character deck size is fixed once the game starts; only per-entry
//!   status, effect and build count mutate afterwards.
//! - The card deck is shuffled exactly once at game start and drawn from
//!   the tail, never reshuffled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChatId, LobbyId};
use crate::value_objects::{CharacterName, QuarterName};

/// Lifecycle of a lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobbyStatus {
    /// Being configured; the game has not started.
    Configuring,
    /// Players are picking characters for this round.
    CharacterSelection,
    /// Turns are being played.
    Playing,
    /// Game over.
    Completed,
}

/// Per-round status of a character card in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterStatus {
    /// Still up for selection.
    Available,
    /// Picked by a player this round.
    Selected,
    /// Removed at end of its owner's turn without revealing it.
    SecretlyRemoved,
    /// Openly removed from the round.
    Removed,
}

/// Deferred effect placed on a character, consumed when its turn begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterEffect {
    #[default]
    None,
    Killed,
    Robbed,
}

/// One entry of the lobby's character deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    name: CharacterName,
    status: CharacterStatus,
    effect: CharacterEffect,
    built_quarters: u8,
}

impl CharacterState {
    pub fn new(name: CharacterName) -> Self {
        Self {
            name,
            status: CharacterStatus::Available,
            effect: CharacterEffect::None,
            built_quarters: 0,
        }
    }

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn status(&self) -> CharacterStatus {
        self.status
    }

    pub fn effect(&self) -> CharacterEffect {
        self.effect
    }

    pub fn built_quarters(&self) -> u8 {
        self.built_quarters
    }

    /// Marks the character as picked by a player.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the character is
    /// still `Available`.
    pub fn select(&mut self) -> Result<(), DomainError> {
        if self.status != CharacterStatus::Available {
            return Err(DomainError::invalid_state_transition(format!(
                "{} is not available for selection",
                self.name
            )));
        }
        self.status = CharacterStatus::Selected;
        Ok(())
    }

    /// Hides the character from later rounds without revealing it.
    pub fn secretly_remove(&mut self) {
        self.status = CharacterStatus::SecretlyRemoved;
    }

    /// Sets the deferred effect. Last write wins: Kill and Steal are
    /// mutually exclusive outcomes within a round since acting order is
    /// fixed by rank.
    pub fn set_effect(&mut self, effect: CharacterEffect) {
        self.effect = effect;
    }

    /// Consumes the deferred effect exactly once.
    ///
    /// Negotiated interface for the turn orchestrator: called when the
    /// owning player's turn begins. Resets to `None`, so a second call
    /// observes nothing.
    pub fn take_effect(&mut self) -> CharacterEffect {
        std::mem::take(&mut self.effect)
    }

    /// Records a completed build for this character's turn.
    pub fn record_build(&mut self) {
        self.built_quarters = self.built_quarters.saturating_add(1);
    }

    /// Resets per-round state for the next selection phase.
    pub fn reset_for_selection(&mut self) {
        self.status = CharacterStatus::Available;
        self.effect = CharacterEffect::None;
        self.built_quarters = 0;
    }
}

/// The lobby aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lobby {
    id: LobbyId,
    group_chat: ChatId,
    status: LobbyStatus,
    card_deck: Vec<QuarterName>,
    character_deck: Vec<CharacterState>,
    created_at: DateTime<Utc>,
}

impl Lobby {
    pub fn new(group_chat: ChatId, now: DateTime<Utc>) -> Self {
        Self {
            id: LobbyId::new(),
            group_chat,
            status: LobbyStatus::Configuring,
            card_deck: Vec::new(),
            character_deck: Vec::new(),
            created_at: now,
        }
    }

    pub fn id(&self) -> LobbyId {
        self.id
    }

    pub fn group_chat(&self) -> ChatId {
        self.group_chat
    }

    pub fn status(&self) -> LobbyStatus {
        self.status
    }

    pub fn card_deck(&self) -> &[QuarterName] {
        &self.card_deck
    }

    pub fn character_deck(&self) -> &[CharacterState] {
        &self.character_deck
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Installs the shuffled decks and opens character selection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the lobby is
    /// still `Configuring`.
    pub fn begin_selection(
        &mut self,
        card_deck: Vec<QuarterName>,
        character_deck: Vec<CharacterState>,
    ) -> Result<(), DomainError> {
        if self.status != LobbyStatus::Configuring {
            return Err(DomainError::invalid_state_transition(
                "game has already started",
            ));
        }
        self.card_deck = card_deck;
        self.character_deck = character_deck;
        self.status = LobbyStatus::CharacterSelection;
        Ok(())
    }

    /// Closes the selection phase and starts play.
    ///
    /// Negotiated interface for the turn orchestrator, like
    /// [`CharacterState::take_effect`]: called once every player holds a
    /// character, persisted through `LobbyRepo::update_status`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless selection is in
    /// progress.
    pub fn begin_play(&mut self) -> Result<(), DomainError> {
        if self.status != LobbyStatus::CharacterSelection {
            return Err(DomainError::invalid_state_transition(
                "selection is not in progress",
            ));
        }
        self.status = LobbyStatus::Playing;
        Ok(())
    }

    /// Ends the game. Orchestrator-facing, called when a round finishes
    /// with at least one completed city.
    pub fn complete(&mut self) {
        self.status = LobbyStatus::Completed;
    }

    /// Draws up to `n` quarters from the tail of the pile.
    ///
    /// The pile is pre-shuffled once at game start; an exhausted pile
    /// simply yields fewer cards.
    pub fn draw(&mut self, n: usize) -> Vec<QuarterName> {
        let take = n.min(self.card_deck.len());
        self.card_deck.split_off(self.card_deck.len() - take)
    }

    /// Returns one quarter to the bottom of the pile.
    pub fn return_to_deck(&mut self, quarter: QuarterName) {
        self.card_deck.insert(0, quarter);
    }

    pub fn character(&self, name: &CharacterName) -> Option<&CharacterState> {
        self.character_deck.iter().find(|c| c.name() == name)
    }

    pub fn character_mut(&mut self, name: &CharacterName) -> Option<&mut CharacterState> {
        self.character_deck.iter_mut().find(|c| c.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> CharacterName {
        CharacterName::new(s).expect("valid name")
    }

    fn quarter(s: &str) -> QuarterName {
        QuarterName::new(s).expect("valid name")
    }

    fn started_lobby() -> Lobby {
        let mut lobby = Lobby::new(ChatId::new(-100), Utc::now());
        lobby
            .begin_selection(
                vec![quarter("Tavern"), quarter("Keep"), quarter("Temple")],
                vec![CharacterState::new(name("Assassin"))],
            )
            .expect("fresh lobby");
        lobby
    }

    #[test]
    fn draws_from_the_tail() {
        let mut lobby = started_lobby();
        let drawn = lobby.draw(2);
        assert_eq!(drawn, vec![quarter("Keep"), quarter("Temple")]);
        assert_eq!(lobby.card_deck(), &[quarter("Tavern")]);
    }

    #[test]
    fn draw_tolerates_exhausted_pile() {
        let mut lobby = started_lobby();
        let drawn = lobby.draw(10);
        assert_eq!(drawn.len(), 3);
        assert!(lobby.card_deck().is_empty());
        assert!(lobby.draw(1).is_empty());
    }

    #[test]
    fn selection_requires_available_status() {
        let mut state = CharacterState::new(name("Thief"));
        state.select().expect("first selection");
        assert!(state.select().is_err());
        assert_eq!(state.status(), CharacterStatus::Selected);
    }

    #[test]
    fn effect_last_write_wins_and_consumes_once() {
        let mut state = CharacterState::new(name("King"));
        state.set_effect(CharacterEffect::Killed);
        state.set_effect(CharacterEffect::Robbed);
        assert_eq!(state.take_effect(), CharacterEffect::Robbed);
        assert_eq!(state.take_effect(), CharacterEffect::None);
    }

    #[test]
    fn cannot_start_twice() {
        let mut lobby = started_lobby();
        assert!(lobby.begin_selection(vec![], vec![]).is_err());
    }

    #[test]
    fn play_requires_selection_first() {
        let mut lobby = Lobby::new(ChatId::new(-100), Utc::now());
        assert!(lobby.begin_play().is_err());
        assert_eq!(lobby.status(), LobbyStatus::Configuring);

        let mut lobby = started_lobby();
        lobby.begin_play().expect("selection open");
        assert_eq!(lobby.status(), LobbyStatus::Playing);
        assert!(lobby.begin_play().is_err());

        lobby.complete();
        assert_eq!(lobby.status(), LobbyStatus::Completed);
    }
}
