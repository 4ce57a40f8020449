use crate::errors::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A character level, always within 1..=20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;
    pub const FIRST: Level = Level(1);

    pub fn new(raw: i64) -> Result<Self, InputError> {
        if raw < Self::MIN as i64 || raw > Self::MAX as i64 {
            return Err(InputError::LevelOutOfRange(raw));
        }
        Ok(Level(raw as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Level {
    type Error = InputError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Level::new(raw)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_level_bounds() {
        assert_eq!(Level::new(1).unwrap().get(), 1);
        assert_eq!(Level::new(20).unwrap().get(), 20);
    }

    #[rstest]
    #[case(0)]
    #[case(21)]
    #[case(-3)]
    fn test_out_of_range_levels_are_rejected(#[case] raw: i64) {
        assert_eq!(Level::new(raw), Err(InputError::LevelOutOfRange(raw)));
    }

    #[test]
    fn test_level_deserialization_validates() {
        let level: Level = serde_json::from_str("7").unwrap();
        assert_eq!(level.get(), 7);
        assert!(serde_json::from_str::<Level>("42").is_err());
    }
}
