use crate::catalog::ReferenceDataProvider;
use crate::errors::{CatalogResult, OptionalRecord};
use schema::EvolutionEdge;
use serde::{Deserialize, Serialize};

/// Evolution links for one creature, with display names attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_to_name: Option<String>,
    /// `"Level N"` when the forward edge has a level condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_from_name: Option<String>,
}

/// Only level conditions are rendered. Trade, item and friendship conditions
/// are carried in the data but have no display text yet.
fn level_condition_text(edge: &EvolutionEdge) -> Option<String> {
    edge.conditions
        .iter()
        .find(|c| c.is_level())
        .map(|c| format!("Level {}", c))
}

fn display_name<P>(provider: &P, id: &str) -> CatalogResult<String>
where
    P: ReferenceDataProvider + ?Sized,
{
    Ok(provider
        .creature_by_id(id)
        .optional()?
        .map_or_else(|| id.to_string(), |c| c.name.clone()))
}

/// Look up where `creature_id` evolves to and from.
///
/// Only the first edge in each direction is used; branching evolutions
/// report their first listed branch. `Ok(None)` when the creature has no
/// edges at all.
pub fn resolve_evolution<P>(provider: &P, creature_id: &str) -> CatalogResult<Option<EvolutionInfo>>
where
    P: ReferenceDataProvider + ?Sized,
{
    let edges = provider.all_evolution_edges()?;
    let forward = edges.iter().find(|e| e.from == creature_id);
    let backward = edges.iter().find(|e| e.to == creature_id);

    if forward.is_none() && backward.is_none() {
        return Ok(None);
    }

    let mut info = EvolutionInfo::default();
    if let Some(edge) = forward {
        info.evolves_to = Some(edge.to.clone());
        info.evolves_to_name = Some(display_name(provider, &edge.to)?);
        info.condition = level_condition_text(edge);
    }
    if let Some(edge) = backward {
        info.evolves_from = Some(edge.from.clone());
        info.evolves_from_name = Some(display_name(provider, &edge.from)?);
    }
    Ok(Some(info))
}
