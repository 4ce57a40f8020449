use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Score assumed for any attribute the reference data leaves out.
pub const DEFAULT_SCORE: i32 = 10;

/// The six ability scores. Natures name these by their lowercase keys.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatKey {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            str: DEFAULT_SCORE,
            dex: DEFAULT_SCORE,
            con: DEFAULT_SCORE,
            int: DEFAULT_SCORE,
            wis: DEFAULT_SCORE,
            cha: DEFAULT_SCORE,
        }
    }
}

/// Base stats of a generated creature: the six scores plus HP and AC.
///
/// Keys follow the reference data (`str`, `dex`, ..., `hp`, `ac`) so a nature's
/// `increasedStat` / `decreasedStat` text can address them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
    pub hp: i32,
    pub ac: i32,
}

impl StatBlock {
    pub fn new(attributes: Attributes, hp: i32, ac: i32) -> Self {
        Self {
            str: attributes.str,
            dex: attributes.dex,
            con: attributes.con,
            int: attributes.int,
            wis: attributes.wis,
            cha: attributes.cha,
            hp,
            ac,
        }
    }

    /// Look a stat up by its data key. Unknown keys yield `None`.
    pub fn get(&self, key: &str) -> Option<i32> {
        match key {
            "str" => Some(self.str),
            "dex" => Some(self.dex),
            "con" => Some(self.con),
            "int" => Some(self.int),
            "wis" => Some(self.wis),
            "cha" => Some(self.cha),
            "hp" => Some(self.hp),
            "ac" => Some(self.ac),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut i32> {
        match key {
            "str" => Some(&mut self.str),
            "dex" => Some(&mut self.dex),
            "con" => Some(&mut self.con),
            "int" => Some(&mut self.int),
            "wis" => Some(&mut self.wis),
            "cha" => Some(&mut self.cha),
            "hp" => Some(&mut self.hp),
            "ac" => Some(&mut self.ac),
            _ => None,
        }
    }

    /// Pairs of (key, value) in display order.
    pub fn entries(&self) -> [(&'static str, i32); 8] {
        [
            ("str", self.str),
            ("dex", self.dex),
            ("con", self.con),
            ("int", self.int),
            ("wis", self.wis),
            ("cha", self.cha),
            ("hp", self.hp),
            ("ac", self.ac),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_stat_key_addresses_the_block() {
        let mut block = StatBlock::new(Attributes::default(), 12, 13);
        for key in StatKey::iter() {
            assert_eq!(block.get(key.as_ref()), Some(DEFAULT_SCORE));
            assert!(block.get_mut(key.as_ref()).is_some());
        }
        assert_eq!(block.get("hp"), Some(12));
        assert_eq!(block.get("ac"), Some(13));
        assert_eq!(block.get("speed"), None);
    }
}
