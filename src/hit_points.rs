//! Hit point calculation using tabletop hit-dice rules.
//!
//! Level 1 always takes the full die. Every later level adds either the
//! rounded-up average of the die (`average`) or a fresh roll (`roll`). The
//! CON modifier is added once per level and the total never drops below 1.

use crate::errors::InputError;
use crate::level::Level;
use rand::Rng;
use schema::Creature;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_DIE_FACES: u32 = 6;
pub const MIN_HP: u32 = 1;
/// Largest die accepted from `d<N>` notation.
pub const MAX_DIE_FACES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HpMethod {
    Average,
    Roll,
}

impl FromStr for HpMethod {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(HpMethod::Average),
            "roll" => Ok(HpMethod::Roll),
            other => Err(InputError::UnknownHpMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HpMethod::Average => write!(f, "average"),
            HpMethod::Roll => write!(f, "roll"),
        }
    }
}

/// Face count parsed from `d<N>` notation. Anything unparsable, or a face
/// count outside `1..=MAX_DIE_FACES`, reads as a d6.
pub fn die_faces(hit_dice: &str) -> u32 {
    let trimmed = hit_dice.trim();
    let digits = trimmed
        .strip_prefix('d')
        .or_else(|| trimmed.strip_prefix('D'))
        .unwrap_or(trimmed);
    match digits.parse::<u32>() {
        Ok(faces) if (1..=MAX_DIE_FACES).contains(&faces) => faces,
        _ => DEFAULT_DIE_FACES,
    }
}

/// `floor((score - 10) / 2)`, rounding toward negative infinity.
pub fn con_modifier(con_score: i32) -> i32 {
    // Widened so extreme scores cannot overflow; the result always fits.
    ((i64::from(con_score) - 10).div_euclid(2)) as i32
}

/// `ceil(faces / 2 + 0.5)`: d6 -> 4, d8 -> 5, d5 -> 3.
pub fn average_die(faces: u32) -> u32 {
    faces / 2 + 1
}

/// Every intermediate value needed to redisplay the arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpBreakdown {
    pub hit_dice: String,
    pub con_score: i32,
    pub con_modifier: i32,
    pub level: u8,
    pub method: HpMethod,
    pub die_value: u32,
    pub per_level_values: Vec<u32>,
    pub con_bonus: i32,
    pub total: u32,
}

impl HpBreakdown {
    pub fn dice_total(&self) -> u32 {
        self.per_level_values
            .iter()
            .fold(0u32, |acc, value| acc.saturating_add(*value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpResult {
    pub hp: u32,
    pub max_hp: u32,
    /// Per-level values for the roll method; `None` for average.
    pub rolls: Option<Vec<u32>>,
    pub breakdown: HpBreakdown,
}

/// Compute hit points for a creature with the given hit dice and CON score.
///
/// Only the roll method consumes randomness. Re-rolling is another call.
pub fn calculate_hp<R>(
    hit_dice: &str,
    con_score: i32,
    level: Level,
    method: HpMethod,
    rng: &mut R,
) -> HpResult
where
    R: Rng + ?Sized,
{
    let faces = die_faces(hit_dice);
    let con_mod = con_modifier(con_score);
    let levels = level.get() as usize;

    let mut per_level_values = Vec::with_capacity(levels);
    per_level_values.push(faces);
    for _ in 1..levels {
        let value = match method {
            HpMethod::Average => average_die(faces),
            HpMethod::Roll => rng.random_range(1..=faces),
        };
        per_level_values.push(value);
    }

    let con_bonus = con_mod.saturating_mul(i32::from(level.get()));
    let dice_total = per_level_values
        .iter()
        .fold(0u32, |acc, value| acc.saturating_add(*value));
    let total = (i64::from(dice_total) + i64::from(con_bonus))
        .clamp(i64::from(MIN_HP), i64::from(u32::MAX)) as u32;

    debug!(
        hit_dice,
        con_score,
        level = level.get(),
        %method,
        total,
        "calculated hit points"
    );

    let rolls = match method {
        HpMethod::Average => None,
        HpMethod::Roll => Some(per_level_values.clone()),
    };

    HpResult {
        hp: total,
        max_hp: total,
        rolls,
        breakdown: HpBreakdown {
            hit_dice: hit_dice.to_string(),
            con_score,
            con_modifier: con_mod,
            level: level.get(),
            method,
            die_value: faces,
            per_level_values,
            con_bonus,
            total,
        },
    }
}

/// Hit points for a catalog creature, using its CON score and hit dice.
pub fn calculate_creature_hp<R>(
    creature: &Creature,
    level: Level,
    method: HpMethod,
    rng: &mut R,
) -> HpResult
where
    R: Rng + ?Sized,
{
    calculate_hp(
        &creature.hit_dice,
        creature.attributes.con,
        level,
        method,
        rng,
    )
}

fn signed(value: i32) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for HpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.breakdown;
        writeln!(f, "Hit Dice: {}", b.hit_dice)?;
        writeln!(
            f,
            "CON Score: {} (modifier: {})",
            b.con_score,
            signed(b.con_modifier)
        )?;
        writeln!(f, "Level: {}", b.level)?;
        let per_level: Vec<String> = b
            .per_level_values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("Lv{}: {}", i + 1, v))
            .collect();
        writeln!(f, "{}", per_level.join("  "))?;
        write!(
            f,
            "Total HP: {} + ({} x {}) = {}",
            b.dice_total(),
            signed(b.con_modifier),
            b.level,
            self.hp
        )
    }
}
