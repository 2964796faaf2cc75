//! Immutable catalogs of character and quarter definitions.
//!
//! Catalogs are loaded once at startup and injected where needed; stored
//! records never carry live references to catalog data. The resolver joins
//! a dynamic record with its definition by name at handler entry, and a
//! missing definition is a fatal configuration error, not a user error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::{CharacterName, QuarterName};

/// Quarter card color, also used for character revenue matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarterColor {
    Yellow,
    Blue,
    Green,
    Red,
    Purple,
}

/// Extra award a character receives when taking resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePerk {
    /// Flat coin award on top of a card take (Merchant).
    BonusCoinsOnCardTake,
    /// Extra card draw on top of a coin take (Architect).
    BonusCardsOnCoinTake,
}

/// How a character computes its revenue from placed quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueRule {
    /// One coin per placed quarter matching the character's color.
    MatchingColor,
    /// One coin per placed quarter costing exactly 1 (Beggar).
    CheapQuarters,
}

/// Static definition of a character role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDef {
    pub name: CharacterName,
    /// Turn-order rank; strictly total-ordered across the catalog.
    pub rank: u8,
    /// Color for revenue matching, if any.
    #[serde(default)]
    pub color: Option<QuarterColor>,
    /// How many quarters this character may build per turn.
    #[serde(default = "default_build_limit")]
    pub build_limit: u8,
    #[serde(default)]
    pub resource_perk: Option<ResourcePerk>,
    #[serde(default)]
    pub revenue: Option<RevenueRule>,
    /// The Thief may never target this character (Beggar).
    #[serde(default)]
    pub immune_to_steal: bool,
}

/// Static definition of a quarter (building card).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterDef {
    pub name: QuarterName,
    /// Build cost in coins; at least 1.
    pub cost: u32,
    pub color: QuarterColor,
    /// Extra score awarded on top of cost when built.
    #[serde(default)]
    pub bonus: u32,
    /// Number of copies of this card in the draw pile.
    #[serde(default = "default_copies")]
    pub copies: u32,
}

fn default_copies() -> u32 {
    1
}

fn default_build_limit() -> u8 {
    1
}

/// Catalog lookup failures are configuration errors and never
/// user-recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Character not in catalog: {0}")]
    UnknownCharacter(CharacterName),
    #[error("Quarter not in catalog: {0}")]
    UnknownQuarter(QuarterName),
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Immutable lookup of character and quarter definitions.
///
/// Characters are kept in rank order; ranks are validated to be unique so
/// "ranked after" comparisons are total.
#[derive(Debug, Clone)]
pub struct Catalog {
    characters: Vec<CharacterDef>,
    quarters: Vec<QuarterDef>,
    character_index: HashMap<CharacterName, usize>,
    quarter_index: HashMap<QuarterName, usize>,
}

impl Catalog {
    pub fn new(
        mut characters: Vec<CharacterDef>,
        quarters: Vec<QuarterDef>,
    ) -> Result<Self, CatalogError> {
        characters.sort_by_key(|c| c.rank);
        for pair in characters.windows(2) {
            if pair[0].rank == pair[1].rank {
                return Err(CatalogError::Invalid(format!(
                    "duplicate character rank {}",
                    pair[0].rank
                )));
            }
        }

        let mut character_index = HashMap::new();
        for (i, def) in characters.iter().enumerate() {
            if character_index.insert(def.name.clone(), i).is_some() {
                return Err(CatalogError::Invalid(format!(
                    "duplicate character name {}",
                    def.name
                )));
            }
        }

        let mut quarter_index = HashMap::new();
        for (i, def) in quarters.iter().enumerate() {
            if def.cost == 0 {
                return Err(CatalogError::Invalid(format!(
                    "quarter {} has zero cost",
                    def.name
                )));
            }
            if quarter_index.insert(def.name.clone(), i).is_some() {
                return Err(CatalogError::Invalid(format!(
                    "duplicate quarter name {}",
                    def.name
                )));
            }
        }

        Ok(Self {
            characters,
            quarters,
            character_index,
            quarter_index,
        })
    }

    pub fn character(&self, name: &CharacterName) -> Result<&CharacterDef, CatalogError> {
        self.character_index
            .get(name)
            .map(|&i| &self.characters[i])
            .ok_or_else(|| CatalogError::UnknownCharacter(name.clone()))
    }

    pub fn quarter(&self, name: &QuarterName) -> Result<&QuarterDef, CatalogError> {
        self.quarter_index
            .get(name)
            .map(|&i| &self.quarters[i])
            .ok_or_else(|| CatalogError::UnknownQuarter(name.clone()))
    }

    /// All characters, in rank order.
    pub fn characters(&self) -> &[CharacterDef] {
        &self.characters
    }

    pub fn quarters(&self) -> &[QuarterDef] {
        &self.quarters
    }
}

/// Tunable game parameters, loaded from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    /// Coins credited by a plain coin take.
    pub coins_per_turn: u32,
    /// Quarters a character may normally build per turn.
    pub quarters_per_turn: u32,
    /// Placed quarters required to complete a city.
    pub quarters_to_win: u32,
    /// Score bonus for completing a city (doubled for the first finisher).
    pub full_build_bonus: u32,
    /// Coins dealt to each player at game start.
    pub starting_coins: u32,
    /// Quarter cards dealt to each player at game start.
    pub starting_quarters: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            coins_per_turn: 2,
            quarters_per_turn: 1,
            quarters_to_win: 8,
            full_build_bonus: 2,
            starting_coins: 2,
            starting_quarters: 4,
        }
    }
}
