//! Reference data store.
//!
//! The catalog is read once from a data directory, normalized into the
//! `schema` records, and then served read-only through
//! [`ReferenceDataProvider`].

use crate::errors::{CatalogError, CatalogResult, RecordKind};
use schema::{
    Ability, Attributes, CatalogMetadata, Creature, CreatureAbility, EvolutionEdge, MoveData,
    MoveTable, Nature, PokemonType, DEFAULT_SCORE,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_HIT_DICE: &str = "d6";

const METADATA_FILE: &str = "metadata.json";
const POKEMON_FILE: &str = "pokemon/pokemon.json";
const MOVES_FILE: &str = "moves/moves.json";
const ABILITIES_FILE: &str = "abilities/abilities.json";
const NATURES_FILE: &str = "natures/natures.json";
const EVOLUTIONS_FILE: &str = "evolutions/evolutions.json";

/// Read access to the reference dataset.
///
/// Lookups by id fail with [`CatalogError::NotFound`]; a provider whose
/// backing store is broken fails with `Unavailable` or `Malformed` instead.
pub trait ReferenceDataProvider {
    fn all_creatures(&self) -> CatalogResult<&[Creature]>;
    fn creature_by_id(&self, id: &str) -> CatalogResult<&Creature>;
    fn all_moves(&self) -> CatalogResult<&[MoveData]>;
    fn move_by_id(&self, id: &str) -> CatalogResult<&MoveData>;
    fn all_abilities(&self) -> CatalogResult<&[Ability]>;
    fn ability_by_id(&self, id: &str) -> CatalogResult<&Ability>;
    fn all_natures(&self) -> CatalogResult<&[Nature]>;
    fn all_evolution_edges(&self) -> CatalogResult<&[EvolutionEdge]>;
}

/// In-memory catalog with id indices over each record list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    creatures: Vec<Creature>,
    creature_index: HashMap<String, usize>,
    moves: Vec<MoveData>,
    move_index: HashMap<String, usize>,
    abilities: Vec<Ability>,
    ability_index: HashMap<String, usize>,
    natures: Vec<Nature>,
    evolutions: Vec<EvolutionEdge>,
    metadata: Option<CatalogMetadata>,
}

/// Result of probing a data directory without loading it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAvailability {
    pub available: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entity_counts: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn build_index<T>(records: &[T], id: impl Fn(&T) -> &str) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        // First record wins on duplicate ids.
        index.entry(id(record).to_string()).or_insert(position);
    }
    index
}

impl Catalog {
    /// Build a catalog from already-normalized records.
    pub fn from_records(
        creatures: Vec<Creature>,
        moves: Vec<MoveData>,
        abilities: Vec<Ability>,
        natures: Vec<Nature>,
        evolutions: Vec<EvolutionEdge>,
    ) -> Self {
        Self {
            creature_index: build_index(&creatures, |c| c.id.as_str()),
            move_index: build_index(&moves, |m| m.id.as_str()),
            ability_index: build_index(&abilities, |a| a.id.as_str()),
            creatures,
            moves,
            abilities,
            natures,
            evolutions,
            metadata: None,
        }
    }

    /// Load every reference file under `data_dir`.
    ///
    /// `metadata.json` and the evolutions file are optional; the rest must be
    /// present and well formed.
    pub fn load(data_dir: &Path) -> CatalogResult<Self> {
        if !data_dir.is_dir() {
            return Err(CatalogError::Unavailable {
                path: data_dir.to_path_buf(),
                reason: "data directory not found".to_string(),
            });
        }

        let pokemon_path = data_dir.join(POKEMON_FILE);
        let raw_creatures: Vec<RawCreature> = read_json_file(&pokemon_path)?;
        let creatures = raw_creatures
            .into_iter()
            .map(|raw| raw.normalize(&pokemon_path))
            .collect::<CatalogResult<Vec<_>>>()?;

        let moves: Vec<MoveData> = read_json_file(&data_dir.join(MOVES_FILE))?;
        let abilities: Vec<Ability> = read_json_file(&data_dir.join(ABILITIES_FILE))?;
        let natures: Vec<Nature> = read_json_file(&data_dir.join(NATURES_FILE))?;

        let evolutions_path = data_dir.join(EVOLUTIONS_FILE);
        let evolutions: Vec<EvolutionEdge> = if evolutions_path.exists() {
            read_json_file(&evolutions_path)?
        } else {
            warn!(path = %evolutions_path.display(), "no evolution data, continuing without it");
            Vec::new()
        };

        let metadata_path = data_dir.join(METADATA_FILE);
        let metadata = if metadata_path.exists() {
            Some(read_json_file::<CatalogMetadata>(&metadata_path)?)
        } else {
            None
        };

        let mut catalog = Self::from_records(creatures, moves, abilities, natures, evolutions);
        catalog.metadata = metadata;

        info!(
            pokemon = catalog.creatures.len(),
            moves = catalog.moves.len(),
            abilities = catalog.abilities.len(),
            natures = catalog.natures.len(),
            evolutions = catalog.evolutions.len(),
            "reference catalog loaded from {}",
            data_dir.display()
        );

        Ok(catalog)
    }

    /// Check that `data_dir` has readable metadata, without loading records.
    pub fn availability(data_dir: &Path) -> SourceAvailability {
        match read_json_file::<CatalogMetadata>(&data_dir.join(METADATA_FILE)) {
            Ok(metadata) => SourceAvailability {
                available: true,
                entity_counts: metadata.entity_counts,
                error: None,
            },
            Err(err) => SourceAvailability {
                available: false,
                entity_counts: BTreeMap::new(),
                error: Some(err.to_string()),
            },
        }
    }

    pub fn metadata(&self) -> Option<&CatalogMetadata> {
        self.metadata.as_ref()
    }
}

impl ReferenceDataProvider for Catalog {
    fn all_creatures(&self) -> CatalogResult<&[Creature]> {
        Ok(&self.creatures)
    }

    fn creature_by_id(&self, id: &str) -> CatalogResult<&Creature> {
        self.creature_index
            .get(id)
            .map(|&i| &self.creatures[i])
            .ok_or_else(|| CatalogError::NotFound {
                kind: RecordKind::Pokemon,
                id: id.to_string(),
            })
    }

    fn all_moves(&self) -> CatalogResult<&[MoveData]> {
        Ok(&self.moves)
    }

    fn move_by_id(&self, id: &str) -> CatalogResult<&MoveData> {
        self.move_index
            .get(id)
            .map(|&i| &self.moves[i])
            .ok_or_else(|| CatalogError::NotFound {
                kind: RecordKind::Move,
                id: id.to_string(),
            })
    }

    fn all_abilities(&self) -> CatalogResult<&[Ability]> {
        Ok(&self.abilities)
    }

    fn ability_by_id(&self, id: &str) -> CatalogResult<&Ability> {
        self.ability_index
            .get(id)
            .map(|&i| &self.abilities[i])
            .ok_or_else(|| CatalogError::NotFound {
                kind: RecordKind::Ability,
                id: id.to_string(),
            })
    }

    fn all_natures(&self) -> CatalogResult<&[Nature]> {
        Ok(&self.natures)
    }

    fn all_evolution_edges(&self) -> CatalogResult<&[EvolutionEdge]> {
        Ok(&self.evolutions)
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> CatalogResult<T> {
    if !path.exists() {
        return Err(CatalogError::Unavailable {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| CatalogError::Unavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| CatalogError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

// --- Raw records as they appear on disk ---

#[derive(Debug, Default, Deserialize)]
struct RawAttributes {
    str: Option<i32>,
    dex: Option<i32>,
    con: Option<i32>,
    int: Option<i32>,
    wis: Option<i32>,
    cha: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCreature {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default, rename = "type")]
    types: Vec<String>,
    #[serde(default)]
    attributes: Option<RawAttributes>,
    #[serde(default)]
    hp: Option<i32>,
    #[serde(default)]
    ac: Option<i32>,
    #[serde(default)]
    hit_dice: Option<String>,
    #[serde(default)]
    sr: Option<f64>,
    #[serde(default)]
    moves: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    abilities: Vec<CreatureAbility>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    min_level: Option<u32>,
    #[serde(default)]
    evolution: Option<serde_json::Value>,
    #[serde(default)]
    speed: serde_json::Value,
    #[serde(default)]
    skills: serde_json::Value,
    #[serde(default)]
    saving_throws: serde_json::Value,
}

/// Missing and zero scores both fall back to the default.
fn score_or_default(score: Option<i32>) -> i32 {
    match score {
        Some(value) if value != 0 => value,
        _ => DEFAULT_SCORE,
    }
}

fn value_list(value: serde_json::Value) -> Vec<serde_json::Value> {
    match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items,
        other => vec![other],
    }
}

impl RawCreature {
    fn normalize(self, source: &Path) -> CatalogResult<Creature> {
        let types = self
            .types
            .iter()
            .map(|tag| {
                PokemonType::from_str(tag).map_err(|_| CatalogError::Malformed {
                    path: source.to_path_buf(),
                    reason: format!("unknown type '{}' on {}", tag, self.id),
                })
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        let raw_attributes = self.attributes.unwrap_or_default();
        let attributes = Attributes {
            str: score_or_default(raw_attributes.str),
            dex: score_or_default(raw_attributes.dex),
            con: score_or_default(raw_attributes.con),
            int: score_or_default(raw_attributes.int),
            wis: score_or_default(raw_attributes.wis),
            cha: score_or_default(raw_attributes.cha),
        };

        let hit_dice = match self.hit_dice {
            Some(dice) if !dice.trim().is_empty() => dice,
            _ => DEFAULT_HIT_DICE.to_string(),
        };

        let moves = normalize_move_table(&self.id, self.moves);

        Ok(Creature {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            number: self.number.unwrap_or(0),
            types,
            attributes,
            hp: score_or_default(self.hp),
            ac: score_or_default(self.ac),
            hit_dice,
            sr: self.sr,
            moves,
            abilities: self.abilities,
            description: self.description,
            size: self.size,
            min_level: self.min_level,
            evolution: self.evolution,
            speed: value_list(self.speed),
            skills: value_list(self.skills),
            saving_throws: value_list(self.saving_throws),
            id: self.id,
        })
    }
}

/// Keep array-valued sources only. TM numbers become their decimal text.
fn normalize_move_table(creature_id: &str, raw: BTreeMap<String, serde_json::Value>) -> MoveTable {
    let mut table = MoveTable::new();
    for (source, value) in raw {
        let serde_json::Value::Array(entries) = value else {
            warn!(creature = creature_id, source = %source, "dropping non-list move source");
            continue;
        };
        let moves = entries
            .into_iter()
            .filter_map(|entry| match entry {
                serde_json::Value::String(id) => Some(id),
                serde_json::Value::Number(number) => Some(number.to_string()),
                other => {
                    warn!(creature = creature_id, source = %source, entry = %other, "dropping move entry");
                    None
                }
            })
            .collect();
        table.insert(source, moves);
    }
    table
}
