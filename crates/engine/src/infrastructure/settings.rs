//! Application configuration loaded from environment

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use citadels_domain::{Catalog, CharacterDef, GameSettings, QuarterDef};

/// Engine configuration loaded from environment
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the catalog JSON file (characters and quarters)
    pub catalog_path: String,

    /// Game parameters
    pub game: GameSettings,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = GameSettings::default();

        Ok(Self {
            catalog_path: env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "./data/catalog.json".to_string()),

            game: GameSettings {
                coins_per_turn: env_or("COINS_PER_TURN", defaults.coins_per_turn)?,
                quarters_per_turn: env_or("QUARTERS_PER_TURN", defaults.quarters_per_turn)?,
                quarters_to_win: env_or("QUARTERS_TO_WIN", defaults.quarters_to_win)?,
                full_build_bonus: env_or("FULL_BUILD_BONUS", defaults.full_build_bonus)?,
                starting_coins: env_or("STARTING_COINS", defaults.starting_coins)?,
                starting_quarters: env_or("STARTING_QUARTERS", defaults.starting_quarters)?,
            },
        })
    }
}

fn env_or(key: &str, default: u32) -> Result<u32> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    characters: Vec<CharacterDef>,
    quarters: Vec<QuarterDef>,
}

/// Load and validate the character/quarter catalog from a JSON file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    let file: CatalogFile = serde_json::from_str(&raw)
        .with_context(|| format!("catalog file {} is not valid JSON", path.display()))?;
    let catalog = Catalog::new(file.characters, file.quarters)
        .with_context(|| format!("catalog file {} failed validation", path.display()))?;
    Ok(catalog)
}
