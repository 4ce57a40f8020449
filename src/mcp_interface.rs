//! Handlers behind the MCP tool server.
//!
//! Each function takes plain arguments, runs one engine operation and
//! returns the text the tool hands back: pretty JSON on success,
//! `Error (<tag>): <message>` on failure. Keeping them here lets them be
//! tested without a transport.

use crate::catalog::{Catalog, ReferenceDataProvider, SourceAvailability};
use crate::errors::{EngineError, EngineResult, InputError};
use crate::generation::{GenerationOptions, GenerationRequest, Generator};
use crate::hit_points::{calculate_creature_hp, HpMethod, HpResult};
use crate::level::Level;
use crate::move_pool::{moves_with_details, resolve_move_pool};
use crate::starters::{filter_starters_by_types, pokemon_types, starter_pokemon, StarterSummary};
use rand::Rng;
use schema::{Ability, MoveData, PokemonType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Caller-facing text for a failed operation.
pub fn format_error(err: &EngineError) -> String {
    format!("Error ({}): {}", err.tag(), err)
}

fn respond<T: Serialize>(result: EngineResult<T>) -> String {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
            format_error(&EngineError::DataUnavailable(format!("failed to encode response: {}", e)))
        }),
        Err(err) => {
            warn!(tag = %err.tag(), "{}", err);
            format_error(&err)
        }
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Generate a random creature, or a specific one when `pokemon_id` is set.
pub fn generate_pokemon<P, R>(
    provider: &P,
    options: &GenerationOptions,
    pokemon_id: Option<String>,
    level: Option<i64>,
    rng: &mut R,
) -> String
where
    P: ReferenceDataProvider + ?Sized,
    R: Rng + ?Sized,
{
    let generator = Generator::with_options(provider, options.clone());
    let request = GenerationRequest {
        creature_id: pokemon_id.filter(|id| !id.trim().is_empty()),
        level,
    };
    respond(generator.generate(&request, rng))
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct HpResponse {
    pokemon_id: String,
    name: String,
    #[serde(flatten)]
    result: HpResult,
}

/// Hit points for a catalog creature. Re-rolling is calling this again.
///
/// Level is checked before the method, and both before the lookup.
pub fn calculate_hp<P, R>(provider: &P, pokemon_id: &str, level: i64, hp_method: &str, rng: &mut R) -> String
where
    P: ReferenceDataProvider + ?Sized,
    R: Rng + ?Sized,
{
    respond(hp_response(provider, pokemon_id, level, hp_method, rng))
}

fn hp_response<P, R>(
    provider: &P,
    pokemon_id: &str,
    level: i64,
    hp_method: &str,
    rng: &mut R,
) -> EngineResult<HpResponse>
where
    P: ReferenceDataProvider + ?Sized,
    R: Rng + ?Sized,
{
    let level = Level::new(level)?;
    let method = HpMethod::from_str(hp_method)?;
    let creature = provider.creature_by_id(&normalize_id(pokemon_id))?;
    Ok(HpResponse {
        pokemon_id: creature.id.clone(),
        name: creature.name.clone(),
        result: calculate_creature_hp(creature, level, method, rng),
    })
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MovesResponse {
    pokemon_id: String,
    level: Level,
    moves: Vec<MoveData>,
    moves_by_level: BTreeMap<u32, Vec<String>>,
}

/// Every level-up move the creature can know at `level`, with details.
pub fn pokemon_moves<P>(provider: &P, pokemon_id: &str, level: i64) -> String
where
    P: ReferenceDataProvider + ?Sized,
{
    respond(moves_response(provider, pokemon_id, level))
}

fn moves_response<P>(provider: &P, pokemon_id: &str, level: i64) -> EngineResult<MovesResponse>
where
    P: ReferenceDataProvider + ?Sized,
{
    let level = Level::new(level)?;
    let creature = provider.creature_by_id(&normalize_id(pokemon_id))?;
    let pool = resolve_move_pool(creature, level);
    Ok(MovesResponse {
        pokemon_id: creature.id.clone(),
        level,
        moves: moves_with_details(provider, &pool.moves)?,
        moves_by_level: pool.moves_by_level,
    })
}

#[derive(Serialize, Debug)]
struct StartersResponse {
    starters: Vec<StarterSummary>,
    types: Vec<PokemonType>,
}

/// Starter candidates. With `types`, only starters carrying all of them.
pub fn list_starters<P>(provider: &P, sprite_base_url: &str, types: Option<&[String]>) -> String
where
    P: ReferenceDataProvider + ?Sized,
{
    respond(starters_response(provider, sprite_base_url, types))
}

fn parse_types(tags: &[String]) -> Result<Vec<PokemonType>, InputError> {
    tags.iter()
        .map(|tag| PokemonType::from_str(tag.trim()).map_err(|_| InputError::UnknownType(tag.clone())))
        .collect()
}

fn starters_response<P>(
    provider: &P,
    sprite_base_url: &str,
    types: Option<&[String]>,
) -> EngineResult<StartersResponse>
where
    P: ReferenceDataProvider + ?Sized,
{
    let starters = starter_pokemon(provider)?;
    let starters = match types {
        Some(tags) if !tags.is_empty() => filter_starters_by_types(&starters, &parse_types(tags)?),
        _ => starters,
    };
    Ok(StartersResponse {
        starters: starters
            .iter()
            .map(|c| StarterSummary::new(c, sprite_base_url))
            .collect(),
        types: pokemon_types(),
    })
}

/// Full move record for a tooltip.
pub fn lookup_move<P>(provider: &P, id: &str) -> String
where
    P: ReferenceDataProvider + ?Sized,
{
    respond::<&MoveData>(provider.move_by_id(id.trim()).map_err(EngineError::from))
}

/// Full ability record for a tooltip.
pub fn lookup_ability<P>(provider: &P, id: &str) -> String
where
    P: ReferenceDataProvider + ?Sized,
{
    respond::<&Ability>(provider.ability_by_id(id.trim()).map_err(EngineError::from))
}

#[derive(Serialize, Debug)]
struct HealthResponse<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    source: SourceAvailability,
}

/// Probe the data directory and report whether the catalog is usable.
pub fn health(catalog: &Catalog, data_dir: &Path) -> String {
    let source = Catalog::availability(data_dir);
    let status = if source.available { "healthy" } else { "unhealthy" };
    let version = catalog.metadata().and_then(|m| m.version.as_deref());
    respond(Ok(HealthResponse {
        status,
        version,
        source,
    }))
}
