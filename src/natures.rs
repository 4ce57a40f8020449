use rand::seq::IndexedRandom;
use rand::Rng;
use schema::{Nature, StatBlock};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The part of a nature shown on a generated creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatureSummary {
    pub id: String,
    pub name: String,
    pub effect: String,
}

impl From<&Nature> for NatureSummary {
    fn from(nature: &Nature) -> Self {
        Self {
            id: nature.id.clone(),
            name: nature.name.clone(),
            effect: nature.effect.clone(),
        }
    }
}

/// Uniform draw over the nature catalog. `None` only for an empty catalog.
pub fn select_nature<'a, R>(natures: &'a [Nature], rng: &mut R) -> Option<&'a Nature>
where
    R: Rng + ?Sized,
{
    natures.choose(rng)
}

/// Apply a nature's +1 / -1 to a copy of `base`.
///
/// Neutral natures change nothing. A stat name the block does not have is
/// skipped on its own; the other half of the shift still applies.
pub fn apply_nature_modifiers(base: &StatBlock, nature: &Nature) -> StatBlock {
    let mut modified = *base;
    if nature.is_neutral() {
        return modified;
    }

    if let Some(stat) = modified.get_mut(&nature.increased_stat) {
        *stat += 1;
    }
    if let Some(stat) = modified.get_mut(&nature.decreased_stat) {
        *stat -= 1;
    }

    debug!(
        nature = %nature.id,
        up = %nature.increased_stat,
        down = %nature.decreased_stat,
        "applied nature modifiers"
    );
    modified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::standard_natures;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use schema::Attributes;

    fn base() -> StatBlock {
        StatBlock::new(
            Attributes {
                str: 12,
                dex: 14,
                con: 13,
                int: 8,
                wis: 10,
                cha: 11,
            },
            20,
            13,
        )
    }

    fn changed_stats(before: &StatBlock, after: &StatBlock) -> Vec<(&'static str, i32)> {
        before
            .entries()
            .iter()
            .zip(after.entries().iter())
            .filter(|(b, a)| b.1 != a.1)
            .map(|(b, a)| (b.0, a.1 - b.1))
            .collect()
    }

    #[test]
    fn test_every_nature_is_neutral_or_shifts_exactly_two_stats() {
        let natures = standard_natures();
        assert_eq!(natures.len(), 25);

        for nature in &natures {
            let before = base();
            let after = apply_nature_modifiers(&before, nature);
            let changes = changed_stats(&before, &after);

            if nature.is_neutral() {
                assert!(changes.is_empty(), "{} should be neutral", nature.id);
            } else {
                assert_eq!(changes.len(), 2, "{} should shift two stats", nature.id);
                assert!(changes.contains(&(static_key(&nature.increased_stat), 1)));
                assert!(changes.contains(&(static_key(&nature.decreased_stat), -1)));
            }
        }
    }

    #[test]
    fn test_unknown_stat_names_are_ignored() {
        let nature = Nature {
            id: "odd".to_string(),
            name: "Odd".to_string(),
            effect: String::new(),
            increased_stat: "speed".to_string(),
            decreased_stat: "wis".to_string(),
        };
        let before = base();
        let after = apply_nature_modifiers(&before, &nature);
        assert_eq!(changed_stats(&before, &after), vec![("wis", -1)]);
    }

    #[test]
    fn test_selection_is_uniform_over_the_catalog() {
        let natures = standard_natures();
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(select_nature(&natures, &mut rng).unwrap().id.clone());
        }
        assert_eq!(seen.len(), natures.len());

        assert!(select_nature(&[], &mut rng).is_none());
    }

    fn static_key(key: &str) -> &'static str {
        base()
            .entries()
            .iter()
            .map(|(k, _)| *k)
            .find(|k| *k == key)
            .unwrap()
    }
}
