use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_DURATION: &str = "instantaneous";

/// Damage descriptor of a move.
///
/// The reference data spells this three ways: the literal `"none"`, a single
/// value (`"1d6"`), or one value per tier (`["1d6", "2d6", ...]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum MovePower {
    None,
    Single(String),
    Multiple(Vec<String>),
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl From<serde_json::Value> for MovePower {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => MovePower::None,
            serde_json::Value::String(text) if text.eq_ignore_ascii_case("none") => MovePower::None,
            serde_json::Value::Array(values) => {
                MovePower::Multiple(values.iter().map(value_text).collect())
            }
            other => MovePower::Single(value_text(&other)),
        }
    }
}

impl From<MovePower> for serde_json::Value {
    fn from(power: MovePower) -> Self {
        match power {
            MovePower::None => serde_json::Value::String("none".to_string()),
            MovePower::Single(value) => serde_json::Value::String(value),
            MovePower::Multiple(values) => {
                serde_json::Value::Array(values.into_iter().map(serde_json::Value::String).collect())
            }
        }
    }
}

impl fmt::Display for MovePower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovePower::None => write!(f, "none"),
            MovePower::Single(value) => write!(f, "{}", value),
            MovePower::Multiple(values) => write!(f, "{}", values.join(" / ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: PokemonType,
    #[serde(default = "no_power")]
    pub power: MovePower,
    pub pp: u32,
    #[serde(default, alias = "time", skip_serializing_if = "Option::is_none")]
    pub casting_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default = "default_duration")]
    pub duration: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_levels: Option<String>,
}

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

fn no_power() -> MovePower {
    MovePower::None
}
