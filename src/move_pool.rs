use crate::catalog::ReferenceDataProvider;
use crate::errors::{CatalogResult, InputError, OptionalRecord};
use crate::level::Level;
use schema::{Creature, MoveData, EGG_MOVES_KEY, LEVEL_MOVES_PREFIX, START_MOVES_KEY, TM_MOVES_KEY};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A roster member knows at most this many moves.
pub const MAX_SELECTED_MOVES: usize = 4;

/// Where a move-table entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Start,
    Level(u32),
    Tm,
    Egg,
}

impl MoveSource {
    /// Parse a move-table key. Keys outside the known shapes yield `None`.
    pub fn parse(key: &str) -> Option<MoveSource> {
        match key {
            START_MOVES_KEY => Some(MoveSource::Start),
            TM_MOVES_KEY => Some(MoveSource::Tm),
            EGG_MOVES_KEY => Some(MoveSource::Egg),
            _ => key
                .strip_prefix(LEVEL_MOVES_PREFIX)
                .and_then(|n| n.parse::<u32>().ok())
                .map(MoveSource::Level),
        }
    }

    /// Level at which the source unlocks. TM and egg moves never unlock by level.
    pub fn unlock_level(self) -> Option<u32> {
        match self {
            MoveSource::Start => Some(1),
            MoveSource::Level(n) => Some(n),
            MoveSource::Tm | MoveSource::Egg => None,
        }
    }
}

/// Every level-up move a creature can know at a given level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePool {
    /// De-duplicated ids, ordered by unlock level.
    pub moves: Vec<String>,
    /// Unlock level -> ids unlocked there, limited to the requested level.
    pub moves_by_level: BTreeMap<u32, Vec<String>>,
}

impl MovePool {
    pub fn contains(&self, move_id: &str) -> bool {
        self.moves.iter().any(|m| m == move_id)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Collect the moves `creature` can know at `level`.
///
/// `start` unlocks at level 1 and `level<N>` at N. TM, egg and unrecognized
/// sources never contribute.
pub fn resolve_move_pool(creature: &Creature, level: Level) -> MovePool {
    let level = level.get() as u32;
    let mut moves_by_level: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    for (key, move_ids) in &creature.moves {
        let Some(unlock) = MoveSource::parse(key).and_then(MoveSource::unlock_level) else {
            continue;
        };
        if unlock <= level {
            moves_by_level
                .entry(unlock)
                .or_default()
                .extend(move_ids.iter().cloned());
        }
    }

    let moves = {
        let mut seen: HashSet<&String> = HashSet::new();
        moves_by_level
            .values()
            .flatten()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    };

    MovePool {
        moves,
        moves_by_level,
    }
}

/// Check a player's move choice: 1-4 ids, each learnable at `level`.
pub fn validate_move_selection(
    creature: &Creature,
    level: Level,
    selected: &[String],
) -> Result<(), InputError> {
    if selected.is_empty() || selected.len() > MAX_SELECTED_MOVES {
        return Err(InputError::MoveSelectionCount(selected.len()));
    }
    let pool = resolve_move_pool(creature, level);
    if let Some(invalid) = selected.iter().find(|id| !pool.contains(id)) {
        return Err(InputError::MoveNotInPool(invalid.clone()));
    }
    Ok(())
}

/// Full move records for `ids`, skipping ids the catalog does not know.
/// A catalog that cannot answer fails the whole call.
pub fn moves_with_details<P>(provider: &P, ids: &[String]) -> CatalogResult<Vec<MoveData>>
where
    P: ReferenceDataProvider + ?Sized,
{
    let mut moves = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(data) = provider.move_by_id(id).optional()? {
            moves.push(data.clone());
        }
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::TestCreatureBuilder;
    use pretty_assertions::assert_eq;

    fn level(n: i64) -> Level {
        Level::new(n).unwrap()
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_source_keys() {
        assert_eq!(MoveSource::parse("start"), Some(MoveSource::Start));
        assert_eq!(MoveSource::parse("level14"), Some(MoveSource::Level(14)));
        assert_eq!(MoveSource::parse("tm"), Some(MoveSource::Tm));
        assert_eq!(MoveSource::parse("egg"), Some(MoveSource::Egg));
        assert_eq!(MoveSource::parse("level"), None);
        assert_eq!(MoveSource::parse("levelup"), None);
        assert_eq!(MoveSource::parse("tutor"), None);
    }

    #[test]
    fn test_pool_is_gated_by_level() {
        let creature = TestCreatureBuilder::new("charmander")
            .with_moves("start", &["scratch", "growl"])
            .with_moves("level6", &["ember"])
            .with_moves("level10", &["smokescreen"])
            .build();

        let pool = resolve_move_pool(&creature, level(6));
        assert_eq!(pool.moves, ids(&["scratch", "growl", "ember"]));
        assert_eq!(pool.moves_by_level.keys().copied().collect::<Vec<_>>(), vec![1, 6]);
        assert!(!pool.contains("smokescreen"));

        let pool = resolve_move_pool(&creature, level(1));
        assert_eq!(pool.moves, ids(&["scratch", "growl"]));
    }

    #[test]
    fn test_tm_and_egg_moves_are_never_in_the_pool() {
        let creature = TestCreatureBuilder::new("eevee")
            .with_moves("start", &["tackle"])
            .with_moves("tm", &["swift", "dig"])
            .with_moves("egg", &["wish"])
            .with_moves("tutor", &["covet"])
            .build();

        let pool = resolve_move_pool(&creature, level(20));
        assert_eq!(pool.moves, ids(&["tackle"]));
    }

    #[test]
    fn test_duplicates_collapse_but_grouping_keeps_them() {
        let creature = TestCreatureBuilder::new("pidgey")
            .with_moves("start", &["tackle", "sand-attack"])
            .with_moves("level2", &["tackle", "gust"])
            .build();

        let pool = resolve_move_pool(&creature, level(5));
        assert_eq!(pool.moves, ids(&["tackle", "sand-attack", "gust"]));
        assert_eq!(pool.moves_by_level[&2], ids(&["tackle", "gust"]));
    }

    #[test]
    fn test_missing_move_table_gives_empty_pool() {
        let creature = TestCreatureBuilder::new("missingno").build();
        assert!(resolve_move_pool(&creature, level(20)).is_empty());
    }

    #[test]
    fn test_selection_validation() {
        let creature = TestCreatureBuilder::new("bulbasaur")
            .with_moves("start", &["tackle", "growl"])
            .with_moves("level6", &["vine-whip"])
            .build();

        assert_eq!(validate_move_selection(&creature, level(1), &ids(&["tackle"])), Ok(()));
        assert_eq!(
            validate_move_selection(&creature, level(1), &[]),
            Err(InputError::MoveSelectionCount(0))
        );
        assert_eq!(
            validate_move_selection(&creature, level(20), &ids(&["tackle", "growl", "vine-whip", "tackle", "growl"])),
            Err(InputError::MoveSelectionCount(5))
        );
        assert_eq!(
            validate_move_selection(&creature, level(1), &ids(&["vine-whip"])),
            Err(InputError::MoveNotInPool("vine-whip".to_string()))
        );
    }
}
