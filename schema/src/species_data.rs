use crate::{Attributes, PokemonType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Creatures at or below this spawn rarity may be picked as a starter.
pub const STARTER_SR_LIMIT: f64 = 0.5;

/// Move-table key for moves known from the start.
pub const START_MOVES_KEY: &str = "start";
/// Move-table key prefix for level-up moves (`level2`, `level6`, ...).
pub const LEVEL_MOVES_PREFIX: &str = "level";
pub const TM_MOVES_KEY: &str = "tm";
pub const EGG_MOVES_KEY: &str = "egg";

/// Acquisition source -> move identifiers, e.g. `"level6" -> ["ember"]`.
pub type MoveTable = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureAbility {
    pub id: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A species record, normalized once at catalog load.
///
/// Optional presentation fields stay optional; stat fields always carry a
/// value (missing scores default to 10, missing hit dice to `d6`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub id: String,
    pub name: String,
    /// Pokedex number. Zero marks a placeholder entry.
    pub number: u32,
    pub types: Vec<PokemonType>,
    pub attributes: Attributes,
    pub hp: i32,
    pub ac: i32,
    pub hit_dice: String,
    /// `None` for records without a rating; those are never starters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr: Option<f64>,
    pub moves: MoveTable,
    pub abilities: Vec<CreatureAbility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution: Option<serde_json::Value>,
    #[serde(default)]
    pub speed: Vec<serde_json::Value>,
    #[serde(default)]
    pub skills: Vec<serde_json::Value>,
    #[serde(default)]
    pub saving_throws: Vec<serde_json::Value>,
}

impl Creature {
    pub fn is_starter_eligible(&self) -> bool {
        self.sr.map_or(false, |sr| sr <= STARTER_SR_LIMIT)
    }

    pub fn is_placeholder(&self) -> bool {
        self.number == 0
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }
}
