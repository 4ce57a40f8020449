use crate::catalog::ReferenceDataProvider;
use crate::errors::{CatalogResult, OptionalRecord};
use rand::seq::IndexedRandom;
use rand::Rng;
use schema::{Creature, CreatureAbility};
use serde::{Deserialize, Serialize};

/// Chance that a creature with a hidden ability rolls it.
pub const HIDDEN_ABILITY_CHANCE: f64 = 0.10;

pub const UNKNOWN_ABILITY_ID: &str = "unknown";

/// The ability a generated creature ends up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAbility {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_hidden: bool,
}

impl SelectedAbility {
    /// Placeholder for creatures with no ability data at all.
    pub fn unknown() -> Self {
        Self {
            id: UNKNOWN_ABILITY_ID.to_string(),
            name: "Unknown".to_string(),
            description: "No ability data".to_string(),
            is_hidden: false,
        }
    }
}

/// Pick one of the creature's ability entries.
///
/// With at least one hidden ability, a Bernoulli trial at `hidden_chance`
/// decides whether to draw from the hidden ones. Otherwise a normal ability is
/// drawn; a list with only hidden entries falls back to its first entry.
pub fn pick_ability_entry<'a, R>(
    creature: &'a Creature,
    hidden_chance: f64,
    rng: &mut R,
) -> Option<&'a CreatureAbility>
where
    R: Rng + ?Sized,
{
    let first = creature.abilities.first()?;

    let (hidden, normal): (Vec<&CreatureAbility>, Vec<&CreatureAbility>) =
        creature.abilities.iter().partition(|a| a.hidden);

    if !hidden.is_empty() && rng.random_bool(hidden_chance) {
        return hidden.choose(rng).copied();
    }

    Some(normal.choose(rng).copied().unwrap_or(first))
}

/// Select an ability at the standard hidden-ability rate.
pub fn select_ability<P, R>(
    provider: &P,
    creature: &Creature,
    rng: &mut R,
) -> CatalogResult<SelectedAbility>
where
    P: ReferenceDataProvider + ?Sized,
    R: Rng + ?Sized,
{
    select_ability_with_chance(provider, creature, HIDDEN_ABILITY_CHANCE, rng)
}

/// Select an ability and attach its catalog name and description.
///
/// Catalog text wins; the creature's own description is the fallback, and the
/// id stands in for a missing name. Only a missing record falls back; a
/// catalog that cannot answer is an error.
pub fn select_ability_with_chance<P, R>(
    provider: &P,
    creature: &Creature,
    hidden_chance: f64,
    rng: &mut R,
) -> CatalogResult<SelectedAbility>
where
    P: ReferenceDataProvider + ?Sized,
    R: Rng + ?Sized,
{
    let Some(entry) = pick_ability_entry(creature, hidden_chance, rng) else {
        return Ok(SelectedAbility::unknown());
    };

    let details = provider.ability_by_id(&entry.id).optional()?;
    Ok(SelectedAbility {
        id: entry.id.clone(),
        name: details
            .map(|a| a.name.clone())
            .unwrap_or_else(|| entry.id.clone()),
        description: details
            .map(|a| a.description.clone())
            .or_else(|| entry.description.clone())
            .unwrap_or_default(),
        is_hidden: entry.hidden,
    })
}
