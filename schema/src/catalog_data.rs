use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A nature shifts one score up and one down. When both name the same
/// score the nature is neutral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nature {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effect: String,
    pub increased_stat: String,
    pub decreased_stat: String,
}

impl Nature {
    pub fn is_neutral(&self) -> bool {
        self.increased_stat == self.decreased_stat
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionCondition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl EvolutionCondition {
    pub fn is_level(&self) -> bool {
        self.kind == "level"
    }
}

impl fmt::Display for EvolutionCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            serde_json::Value::String(text) => write!(f, "{}", text),
            serde_json::Value::Null => write!(f, "{}", self.kind),
            other => write!(f, "{}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub conditions: Vec<EvolutionCondition>,
}

/// Contents of `metadata.json` at the root of the data directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub entity_counts: BTreeMap<String, u64>,
}
