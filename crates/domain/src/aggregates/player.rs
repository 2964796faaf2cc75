//! Player aggregate.
//!
//! # Invariants
//!
//! - `coins` never goes negative; debits are checked.
//! - `placed_quarters` holds at most one entry per quarter name.
//! - `score` is a running ledger kept consistent with every mutation, not
//!   recomputed from placed quarters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChatId, LobbyId, MessageId, PlayerId};
use crate::value_objects::{CharacterName, GameActions, QuarterName};

/// A quarter standing in a player's city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedQuarter {
    pub name: QuarterName,
    /// Per-instance bonus score granted at build time.
    pub bonus: u32,
}

/// The player aggregate. References its lobby by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    lobby_id: LobbyId,
    chat: ChatId,
    coins: u32,
    score: u32,
    character_hand: Vec<CharacterName>,
    quarter_hand: Vec<QuarterName>,
    placed_quarters: Vec<PlacedQuarter>,
    game_actions: GameActions,
    /// Pending UI messages, deleted before a new keyboard is issued.
    menu_messages: Vec<MessageId>,
    /// The single replaceable inline error message, if any.
    error_message: Option<MessageId>,
    created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(lobby_id: LobbyId, chat: ChatId, now: DateTime<Utc>) -> Self {
        Self {
            id: PlayerId::new(),
            lobby_id,
            chat,
            coins: 0,
            score: 0,
            character_hand: Vec::new(),
            quarter_hand: Vec::new(),
            placed_quarters: Vec::new(),
            game_actions: GameActions::default(),
            menu_messages: Vec::new(),
            error_message: None,
            created_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn lobby_id(&self) -> LobbyId {
        self.lobby_id
    }

    pub fn chat(&self) -> ChatId {
        self.chat
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn character_hand(&self) -> &[CharacterName] {
        &self.character_hand
    }

    pub fn quarter_hand(&self) -> &[QuarterName] {
        &self.quarter_hand
    }

    pub fn placed_quarters(&self) -> &[PlacedQuarter] {
        &self.placed_quarters
    }

    pub fn city_size(&self) -> usize {
        self.placed_quarters.len()
    }

    pub fn actions(&self) -> &GameActions {
        &self.game_actions
    }

    pub fn actions_mut(&mut self) -> &mut GameActions {
        &mut self.game_actions
    }

    pub fn set_actions(&mut self, actions: GameActions) {
        self.game_actions = actions;
    }

    pub fn menu_messages(&self) -> &[MessageId] {
        &self.menu_messages
    }

    pub fn error_message(&self) -> Option<MessageId> {
        self.error_message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // =========================================================================
    // Economy
    // =========================================================================

    pub fn credit_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Debits coins, keeping the balance non-negative.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` when the balance is insufficient.
    pub fn debit_coins(&mut self, amount: u32) -> Result<(), DomainError> {
        if self.coins < amount {
            return Err(DomainError::constraint(format!(
                "insufficient coins: have {}, need {}",
                self.coins, amount
            )));
        }
        self.coins -= amount;
        Ok(())
    }

    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Deducts previously credited score (destruction of a placed quarter).
    pub fn deduct_score(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }

    // =========================================================================
    // Hands and city
    // =========================================================================

    pub fn pick_character(&mut self, name: CharacterName) {
        self.character_hand.push(name);
    }

    /// Clears the per-round character hand for a new selection phase.
    pub fn reset_character_hand(&mut self) {
        self.character_hand.clear();
    }

    pub fn add_to_hand(&mut self, quarters: impl IntoIterator<Item = QuarterName>) {
        self.quarter_hand.extend(quarters);
    }

    /// Removes one copy of the named quarter from hand.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` when the quarter is not held.
    pub fn take_from_hand(&mut self, name: &QuarterName) -> Result<QuarterName, DomainError> {
        let index = self
            .quarter_hand
            .iter()
            .position(|q| q == name)
            .ok_or_else(|| DomainError::constraint(format!("{} is not in hand", name)))?;
        Ok(self.quarter_hand.remove(index))
    }

    /// Replaces the whole quarter hand (exchange of hands).
    pub fn replace_hand(&mut self, hand: Vec<QuarterName>) -> Vec<QuarterName> {
        std::mem::replace(&mut self.quarter_hand, hand)
    }

    pub fn has_built(&self, name: &QuarterName) -> bool {
        self.placed_quarters.iter().any(|p| &p.name == name)
    }

    /// Places a quarter in the city.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` when a quarter of the same name is
    /// already placed; each name is unique per city.
    pub fn place_quarter(&mut self, name: QuarterName, bonus: u32) -> Result<(), DomainError> {
        if self.has_built(&name) {
            return Err(DomainError::constraint(format!(
                "{} is already placed",
                name
            )));
        }
        self.placed_quarters.push(PlacedQuarter { name, bonus });
        Ok(())
    }

    /// Removes a placed quarter (destruction).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` when no such quarter is placed.
    pub fn remove_placed(&mut self, name: &QuarterName) -> Result<PlacedQuarter, DomainError> {
        let index = self
            .placed_quarters
            .iter()
            .position(|p| &p.name == name)
            .ok_or_else(|| DomainError::constraint(format!("{} is not placed", name)))?;
        Ok(self.placed_quarters.remove(index))
    }

    // =========================================================================
    // UI bookkeeping
    // =========================================================================

    pub fn push_menu_message(&mut self, id: MessageId) {
        self.menu_messages.push(id);
    }

    /// Takes the pending UI message ids, leaving the list empty.
    pub fn take_menu_messages(&mut self) -> Vec<MessageId> {
        std::mem::take(&mut self.menu_messages)
    }

    pub fn set_error_message(&mut self, id: Option<MessageId>) {
        self.error_message = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter(s: &str) -> QuarterName {
        QuarterName::new(s).expect("valid name")
    }

    fn player() -> Player {
        Player::new(LobbyId::new(), ChatId::new(42), Utc::now())
    }

    #[test]
    fn debit_rejects_overdraft() {
        let mut p = player();
        p.credit_coins(3);
        assert!(p.debit_coins(4).is_err());
        assert_eq!(p.coins(), 3);
        p.debit_coins(3).expect("covered");
        assert_eq!(p.coins(), 0);
    }

    #[test]
    fn placed_quarter_names_are_unique() {
        let mut p = player();
        p.place_quarter(quarter("Tavern"), 0).expect("first build");
        assert!(p.place_quarter(quarter("Tavern"), 0).is_err());
        assert_eq!(p.city_size(), 1);
    }

    #[test]
    fn take_from_hand_removes_single_copy() {
        let mut p = player();
        p.add_to_hand([quarter("Tavern"), quarter("Tavern"), quarter("Keep")]);
        p.take_from_hand(&quarter("Tavern")).expect("held");
        assert_eq!(p.quarter_hand().len(), 2);
        assert!(p.quarter_hand().contains(&quarter("Tavern")));
    }

    #[test]
    fn take_from_hand_rejects_missing_quarter() {
        let mut p = player();
        assert!(p.take_from_hand(&quarter("Keep")).is_err());
    }

    #[test]
    fn remove_placed_returns_instance_bonus() {
        let mut p = player();
        p.place_quarter(quarter("Temple"), 2).expect("build");
        let placed = p.remove_placed(&quarter("Temple")).expect("placed");
        assert_eq!(placed.bonus, 2);
        assert_eq!(p.city_size(), 0);
    }

    #[test]
    fn take_menu_messages_empties_the_list() {
        let mut p = player();
        p.push_menu_message(MessageId::new(1));
        p.push_menu_message(MessageId::new(2));
        assert_eq!(p.take_menu_messages().len(), 2);
        assert!(p.menu_messages().is_empty());
    }
}
