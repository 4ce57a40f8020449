// Pokemon Builder Schema - Shared reference-data definitions
// These are the normalized records the builder engine reads. Loading and
// normalizing raw JSON happens in the main crate's catalog module.

pub use catalog_data::*;
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;
pub use stats::*;

pub mod catalog_data;
pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
pub mod stats;
