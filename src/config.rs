//! Runtime configuration for the builder binaries.
//!
//! Settings come from an optional RON file and are then overridden by
//! environment variables:
//! - `POKEMON_BUILDER_DATA_DIR` - reference dataset root
//! - `POKEMON_BUILDER_SPRITE_BASE_URL` - sprite URL prefix
//! - `POKEMON_BUILDER_SEED` - fixed RNG seed
//! - `POKEMON_BUILDER_HIDDEN_ABILITY_CHANCE` - hidden ability probability

use crate::abilities::HIDDEN_ABILITY_CHANCE;
use crate::errors::ConfigError;
use crate::level::Level;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Level used when a generation request does not name one.
pub const DEFAULT_GENERATION_LEVEL: u8 = 5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub data_dir: PathBuf,
    pub sprite_base_url: String,
    pub hidden_ability_chance: f64,
    pub default_level: u8,
    pub seed: Option<u64>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            hidden_ability_chance: HIDDEN_ABILITY_CHANCE,
            default_level: DEFAULT_GENERATION_LEVEL,
            seed: None,
        }
    }
}

impl BuilderConfig {
    /// Load the RON file at `path` if it exists, apply environment overrides,
    /// then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content)
    }

    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(dir) = env::var("POKEMON_BUILDER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var("POKEMON_BUILDER_SPRITE_BASE_URL") {
            self.sprite_base_url = url;
        }
        if let Some(seed) = read_env::<u64>("POKEMON_BUILDER_SEED")? {
            self.seed = Some(seed);
        }
        if let Some(chance) = read_env::<f64>("POKEMON_BUILDER_HIDDEN_ABILITY_CHANCE")? {
            self.hidden_ability_chance = chance;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.hidden_ability_chance) {
            return Err(ConfigError::InvalidValue {
                key: "hidden_ability_chance".to_string(),
                value: self.hidden_ability_chance.to_string(),
            });
        }
        if Level::new(self.default_level as i64).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "default_level".to_string(),
                value: self.default_level.to_string(),
            });
        }
        Ok(())
    }

    /// The configured default level. `validate` guarantees it is in range.
    pub fn default_level(&self) -> Level {
        Level::new(self.default_level as i64).unwrap_or(Level::FIRST)
    }
}

fn read_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
