// In: src/lib.rs

//! Pokemon Character Builder Engine
//!
//! Rolls creatures from a reference catalog using tabletop rules: level-gated
//! move pools, hidden-ability odds, stat-shifting natures, hit dice HP and
//! evolution links. Every random step takes an explicit, seedable generator.

// --- MODULE DECLARATIONS ---
pub mod abilities;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod evolution;
pub mod generation;
pub mod hit_points;
pub mod level;
pub mod mcp_interface;
pub mod move_pool;
pub mod natures;
pub mod roster;
pub mod starters;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    Ability, Attributes, CatalogMetadata, Creature, CreatureAbility, EvolutionCondition,
    EvolutionEdge, MoveData, MovePower, MoveTable, Nature, PokemonType, StatBlock, StatKey,
};

// --- From this crate's modules (`src/`) ---

// Reference data access.
pub use catalog::{Catalog, ReferenceDataProvider, SourceAvailability};
pub use config::BuilderConfig;

// Engine operations.
pub use abilities::{select_ability, SelectedAbility};
pub use evolution::{resolve_evolution, EvolutionInfo};
pub use generation::{GeneratedCreature, GenerationOptions, GenerationRequest, Generator};
pub use hit_points::{calculate_hp, HpBreakdown, HpMethod, HpResult};
pub use level::Level;
pub use move_pool::{resolve_move_pool, validate_move_selection, MovePool};
pub use natures::{apply_nature_modifiers, select_nature};
pub use roster::{build_starter, PlayerPokemon, Roster, StarterRequest};

// Crate-specific error and result types.
pub use errors::{
    CatalogError, CatalogResult, ConfigError, EngineError, EngineResult, ErrorTag, InputError,
    RecordKind,
};
