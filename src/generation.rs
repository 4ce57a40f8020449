//! Generation orchestrator.
//!
//! Pulls one creature from the catalog (by id or at random) and rolls the
//! rest of its character: a loadout of up to four moves, an ability, a nature
//! and the nature-adjusted stats, plus its evolution links.

use crate::abilities::{select_ability_with_chance, SelectedAbility, HIDDEN_ABILITY_CHANCE};
use crate::catalog::ReferenceDataProvider;
use crate::config::{BuilderConfig, DEFAULT_GENERATION_LEVEL, DEFAULT_SPRITE_BASE_URL};
use crate::errors::{CatalogResult, EngineError, EngineResult, RecordKind};
use crate::evolution::{resolve_evolution, EvolutionInfo};
use crate::level::Level;
use crate::move_pool::{moves_with_details, MAX_SELECTED_MOVES};
use crate::natures::{apply_nature_modifiers, select_nature, NatureSummary};
use crate::starters::sprite_url;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use schema::{Creature, MoveData, PokemonType, StatBlock, START_MOVES_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Level-up checkpoints the generated loadout draws from, on top of `start`.
pub const GENERATION_MOVE_LEVELS: [u32; 5] = [2, 6, 10, 14, 18];

/// A generation request as callers send it. `level` is validated here, not
/// by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, alias = "pokemonId")]
    pub creature_id: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
}

impl GenerationRequest {
    pub fn random(level: i64) -> Self {
        Self {
            creature_id: None,
            level: Some(level),
        }
    }

    pub fn specific(creature_id: impl Into<String>, level: i64) -> Self {
        Self {
            creature_id: Some(creature_id.into()),
            level: Some(level),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub sprite_base_url: String,
    pub hidden_ability_chance: f64,
    pub default_level: Level,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            hidden_ability_chance: HIDDEN_ABILITY_CHANCE,
            default_level: Level::new(DEFAULT_GENERATION_LEVEL as i64).unwrap_or(Level::FIRST),
        }
    }
}

impl From<&BuilderConfig> for GenerationOptions {
    fn from(config: &BuilderConfig) -> Self {
        Self {
            sprite_base_url: config.sprite_base_url.clone(),
            hidden_ability_chance: config.hidden_ability_chance,
            default_level: config.default_level(),
        }
    }
}

/// The move fields shown on a generated creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMove {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: PokemonType,
    pub description: String,
    pub pp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl From<&MoveData> for GeneratedMove {
    fn from(data: &MoveData) -> Self {
        Self {
            id: data.id.clone(),
            name: data.name.clone(),
            move_type: data.move_type,
            description: data.description.clone(),
            pp: data.pp,
            range: data.range.clone(),
        }
    }
}

/// A freshly rolled creature. Nothing here is persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCreature {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub types: Vec<PokemonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sprite_url: String,
    pub level: Level,
    pub base_stats: StatBlock,
    pub modified_stats: StatBlock,
    pub nature: NatureSummary,
    pub ability: SelectedAbility,
    pub moves: Vec<GeneratedMove>,
    pub evolution: Option<EvolutionInfo>,
    pub speed: Vec<serde_json::Value>,
    pub skills: Vec<serde_json::Value>,
    pub saving_throws: Vec<serde_json::Value>,
}

/// Build the generated loadout: `start` plus the fixed checkpoints the level
/// has reached, shuffled, first four kept.
///
/// This is deliberately narrower than [`crate::move_pool::resolve_move_pool`].
/// Level keys between checkpoints (`level4`, `level9`, ...) never appear
/// here, and duplicates across sources are kept. Ids missing from the move
/// catalog are dropped after the cut, so fewer than four can come back.
pub fn select_generation_moves<P, R>(
    provider: &P,
    creature: &Creature,
    level: Level,
    rng: &mut R,
) -> CatalogResult<Vec<MoveData>>
where
    P: ReferenceDataProvider + ?Sized,
    R: Rng + ?Sized,
{
    let level = level.get() as u32;
    let mut pool: Vec<String> = creature
        .moves
        .get(START_MOVES_KEY)
        .cloned()
        .unwrap_or_default();

    for checkpoint in GENERATION_MOVE_LEVELS {
        if level >= checkpoint {
            if let Some(ids) = creature.moves.get(&format!("level{}", checkpoint)) {
                pool.extend(ids.iter().cloned());
            }
        }
    }

    pool.shuffle(rng);
    pool.truncate(MAX_SELECTED_MOVES);
    moves_with_details(provider, &pool)
}

/// Runs a generation request against a reference catalog.
pub struct Generator<'a, P: ReferenceDataProvider + ?Sized> {
    provider: &'a P,
    options: GenerationOptions,
}

impl<'a, P: ReferenceDataProvider + ?Sized> Generator<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self::with_options(provider, GenerationOptions::default())
    }

    pub fn with_options(provider: &'a P, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// Generate one creature.
    ///
    /// Errors with `InvalidInput(LevelOutOfRange)` for a level outside 1..=20,
    /// `NotFound` for an unknown id, and `DataUnavailable` when the catalog
    /// has no creatures or no natures to draw from.
    pub fn generate<R>(&self, request: &GenerationRequest, rng: &mut R) -> EngineResult<GeneratedCreature>
    where
        R: Rng + ?Sized,
    {
        let level = match request.level {
            Some(raw) => Level::new(raw)?,
            None => self.options.default_level,
        };

        let creature = match request.creature_id.as_deref() {
            Some(id) => self.provider.creature_by_id(&id.trim().to_lowercase())?,
            None => self.random_creature(rng)?,
        };
        debug!(creature = %creature.id, %level, "generating creature");

        let moves = select_generation_moves(self.provider, creature, level, rng)?;
        let ability =
            select_ability_with_chance(self.provider, creature, self.options.hidden_ability_chance, rng)?;

        let natures = self.provider.all_natures()?;
        let nature = select_nature(natures, rng)
            .ok_or_else(|| EngineError::DataUnavailable("nature catalog is empty".to_string()))?;

        let evolution = resolve_evolution(self.provider, &creature.id)?;

        let base_stats = StatBlock::new(creature.attributes, creature.hp, creature.ac);
        let modified_stats = apply_nature_modifiers(&base_stats, nature);

        debug!(
            creature = %creature.id,
            moves = moves.len(),
            ability = %ability.id,
            hidden = ability.is_hidden,
            nature = %nature.id,
            "generation complete"
        );

        Ok(GeneratedCreature {
            id: creature.id.clone(),
            name: creature.name.clone(),
            number: creature.number,
            types: creature.types.clone(),
            size: creature.size.clone(),
            description: creature.description.clone(),
            sprite_url: sprite_url(&self.options.sprite_base_url, creature.number),
            level,
            base_stats,
            modified_stats,
            nature: NatureSummary::from(nature),
            ability,
            moves: moves.iter().map(GeneratedMove::from).collect(),
            evolution,
            speed: creature.speed.clone(),
            skills: creature.skills.clone(),
            saving_throws: creature.saving_throws.clone(),
        })
    }

    /// Uniform pick over the whole catalog, placeholders included.
    fn random_creature<R>(&self, rng: &mut R) -> EngineResult<&'a Creature>
    where
        R: Rng + ?Sized,
    {
        let creatures: &'a [Creature] = self.provider.all_creatures()?;
        creatures.choose(rng).ok_or_else(|| {
            EngineError::DataUnavailable(format!("{} catalog is empty", RecordKind::Pokemon))
        })
    }
}

impl fmt::Display for GeneratedCreature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<String> = self.types.iter().map(|t| t.to_string()).collect();
        writeln!(f, "{} #{} (Lv. {})", self.name, self.number, self.level)?;
        writeln!(f, "--------------------")?;
        writeln!(f, "Type: {}", types.join(" / "))?;
        writeln!(f, "Nature: {} ({})", self.nature.name, self.nature.effect)?;
        let hidden = if self.ability.is_hidden { " [hidden]" } else { "" };
        writeln!(f, "Ability: {}{}", self.ability.name, hidden)?;

        let stats: Vec<String> = self
            .modified_stats
            .entries()
            .iter()
            .zip(self.base_stats.entries().iter())
            .map(|((key, value), (_, base))| {
                if value == base {
                    format!("{}: {}", key.to_uppercase(), value)
                } else {
                    format!("{}: {} ({:+})", key.to_uppercase(), value, value - base)
                }
            })
            .collect();
        writeln!(f, "{}", stats.join(" | "))?;

        if !self.moves.is_empty() {
            writeln!(f, "Moves:")?;
            for m in &self.moves {
                writeln!(f, "- {} ({}, PP {})", m.name, m.move_type, m.pp)?;
            }
        }

        if let Some(evolution) = &self.evolution {
            if let Some(from) = &evolution.evolves_from_name {
                writeln!(f, "Evolves from: {}", from)?;
            }
            if let Some(to) = &evolution.evolves_to_name {
                match &evolution.condition {
                    Some(condition) => writeln!(f, "Evolves to: {} ({})", to, condition)?,
                    None => writeln!(f, "Evolves to: {}", to)?,
                }
            }
        }
        Ok(())
    }
}
