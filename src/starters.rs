//! Starter selection and collection browsing views.

use crate::catalog::ReferenceDataProvider;
use crate::errors::CatalogResult;
use schema::{Attributes, Creature, CreatureAbility, PokemonType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// `{base}/{number}.png`, tolerating a trailing slash on the base.
pub fn sprite_url(base: &str, number: u32) -> String {
    format!("{}/{}.png", base.trim_end_matches('/'), number)
}

pub fn is_starter_eligible(creature: &Creature) -> bool {
    creature.is_starter_eligible()
}

/// The 18 type tags in canonical order.
pub fn pokemon_types() -> Vec<PokemonType> {
    PokemonType::all()
}

fn by_number<'a>(creatures: impl Iterator<Item = &'a Creature>) -> Vec<&'a Creature> {
    let mut list: Vec<&Creature> = creatures.collect();
    list.sort_by_key(|c| c.number);
    list
}

/// Starter-eligible creatures with a real Pokedex number, by number.
pub fn starter_pokemon<P>(provider: &P) -> CatalogResult<Vec<&Creature>>
where
    P: ReferenceDataProvider + ?Sized,
{
    let creatures = provider.all_creatures()?;
    Ok(by_number(
        creatures
            .iter()
            .filter(|c| !c.is_placeholder() && c.is_starter_eligible()),
    ))
}

/// Starters carrying every one of `selected`. No selection, no results.
pub fn filter_starters_by_types<'a>(
    starters: &[&'a Creature],
    selected: &[PokemonType],
) -> Vec<&'a Creature> {
    if selected.is_empty() {
        return Vec::new();
    }
    starters
        .iter()
        .filter(|c| selected.iter().all(|t| c.has_type(*t)))
        .copied()
        .collect()
}

/// Every non-placeholder creature, by number.
pub fn collection<P>(provider: &P) -> CatalogResult<Vec<&Creature>>
where
    P: ReferenceDataProvider + ?Sized,
{
    let creatures = provider.all_creatures()?;
    Ok(by_number(creatures.iter().filter(|c| !c.is_placeholder())))
}

/// Collection-page filter. Types match on ANY overlap; `sr` matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionFilter {
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub sr: Option<f64>,
}

impl CollectionFilter {
    pub fn matches(&self, creature: &Creature) -> bool {
        let type_match =
            self.types.is_empty() || self.types.iter().any(|t| creature.has_type(*t));
        let sr_match = self.sr.map_or(true, |sr| creature.sr == Some(sr));
        type_match && sr_match
    }

    pub fn apply<'a>(&self, creatures: &[&'a Creature]) -> Vec<&'a Creature> {
        creatures
            .iter()
            .filter(|c| self.matches(c))
            .copied()
            .collect()
    }
}

/// Distinct spawn-rarity values in ascending order.
pub fn sr_values<P>(provider: &P) -> CatalogResult<Vec<f64>>
where
    P: ReferenceDataProvider + ?Sized,
{
    let creatures = provider.all_creatures()?;
    let mut seen = HashSet::new();
    let mut values: Vec<f64> = creatures
        .iter()
        .filter_map(|c| c.sr)
        .filter(|sr| seen.insert(sr.to_bits()))
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}

/// What the starter picker shows for each candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterSummary {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub types: Vec<PokemonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr: Option<f64>,
    pub sprite_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attributes: Attributes,
    pub abilities: Vec<CreatureAbility>,
    pub hp: i32,
    pub ac: i32,
}

impl StarterSummary {
    pub fn new(creature: &Creature, sprite_base_url: &str) -> Self {
        Self {
            id: creature.id.clone(),
            name: creature.name.clone(),
            number: creature.number,
            types: creature.types.clone(),
            sr: creature.sr,
            sprite_url: sprite_url(sprite_base_url, creature.number),
            description: creature.description.clone(),
            attributes: creature.attributes,
            abilities: creature.abilities.clone(),
            hp: creature.hp,
            ac: creature.ac,
        }
    }
}
