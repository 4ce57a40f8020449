//! A player's creatures: six active slots plus unbounded storage.
//!
//! Only the rules live here. Saving and loading members belongs to whatever
//! store sits behind the caller.

use crate::catalog::ReferenceDataProvider;
use crate::errors::{EngineResult, InputError};
use crate::hit_points::{calculate_creature_hp, HpMethod};
use crate::level::Level;
use crate::move_pool::validate_move_selection;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const ACTIVE_SLOTS: u8 = 6;
pub const STARTER_SLOT: u8 = 1;
pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const MAX_PAGE_LIMIT: usize = 50;

/// One creature owned by a player.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPokemon {
    pub member_id: u64,
    pub pokemon_id: String,
    pub nickname: Option<String>,
    pub level: Level,
    pub selected_moves: Option<Vec<String>>,
    pub current_hp: Option<u32>,
    pub max_hp: Option<u32>,
    pub hp_method: Option<HpMethod>,
    pub hp_rolls: Option<Vec<u32>>,
    /// 1..=6 while active, `None` in storage.
    pub slot: Option<u8>,
    /// Order of acquisition; storage lists the newest first.
    pub acquired_seq: u64,
}

impl PlayerPokemon {
    pub fn new(pokemon_id: impl Into<String>, level: Level) -> Self {
        Self {
            member_id: 0,
            pokemon_id: pokemon_id.into(),
            nickname: None,
            level,
            selected_moves: None,
            current_hp: None,
            max_hp: None,
            hp_method: None,
            hp_rolls: None,
            slot: None,
            acquired_seq: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.pokemon_id)
    }
}

/// A starter pick as the player submits it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StarterRequest {
    pub pokemon_id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub selected_moves: Option<Vec<String>>,
    /// `"average"` or `"roll"`; anything else is rejected.
    #[serde(default)]
    pub hp_method: Option<String>,
}

/// Validate a starter pick and build the level-1 member for it.
///
/// Moves, when given, must be 1-4 ids from the level-1 pool. HP is only
/// computed when a method is given. The result has no id or slot yet; see
/// [`Roster::add_starter`].
pub fn build_starter<P, R>(provider: &P, request: &StarterRequest, rng: &mut R) -> EngineResult<PlayerPokemon>
where
    P: ReferenceDataProvider + ?Sized,
    R: Rng + ?Sized,
{
    let pokemon_id = request.pokemon_id.trim().to_lowercase();
    let creature = provider.creature_by_id(&pokemon_id)?;
    if !creature.is_starter_eligible() {
        return Err(InputError::NotStarterEligible(creature.id.clone()).into());
    }

    let level = Level::FIRST;
    let mut member = PlayerPokemon::new(creature.id.clone(), level);
    member.nickname = request.nickname.clone().filter(|n| !n.trim().is_empty());

    if let Some(moves) = &request.selected_moves {
        validate_move_selection(creature, level, moves)?;
        member.selected_moves = Some(moves.clone());
    }

    if let Some(raw) = &request.hp_method {
        let method: HpMethod = raw.parse()?;
        let hp = calculate_creature_hp(creature, level, method, rng);
        member.current_hp = Some(hp.hp);
        member.max_hp = Some(hp.max_hp);
        member.hp_method = Some(method);
        member.hp_rolls = hp.rolls;
    }

    debug!(pokemon = %member.pokemon_id, "starter validated");
    Ok(member)
}

/// One of the six active positions, filled or not.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterSlot<'a> {
    pub slot_number: u8,
    pub pokemon: Option<&'a PlayerPokemon>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StoragePage<'a> {
    pub pokemon: Vec<&'a PlayerPokemon>,
    pub pagination: Pagination,
}

/// Everything a player owns.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Roster {
    members: Vec<PlayerPokemon>,
    next_member_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[PlayerPokemon] {
        &self.members
    }

    pub fn get(&self, member_id: u64) -> Option<&PlayerPokemon> {
        self.members.iter().find(|m| m.member_id == member_id)
    }

    fn get_mut(&mut self, member_id: u64) -> Result<&mut PlayerPokemon, InputError> {
        self.members
            .iter_mut()
            .find(|m| m.member_id == member_id)
            .ok_or(InputError::UnknownMember(member_id))
    }

    pub fn has_starter(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_active()).count()
    }

    fn occupant(&self, slot: u8) -> Option<&PlayerPokemon> {
        self.members.iter().find(|m| m.slot == Some(slot))
    }

    fn first_free_slot(&self) -> Option<u8> {
        (1..=ACTIVE_SLOTS).find(|slot| self.occupant(*slot).is_none())
    }

    fn check_slot(slot: u8) -> Result<(), InputError> {
        if (1..=ACTIVE_SLOTS).contains(&slot) {
            Ok(())
        } else {
            Err(InputError::InvalidSlot(slot))
        }
    }

    fn admit(&mut self, mut member: PlayerPokemon, slot: Option<u8>) -> u64 {
        self.next_member_id += 1;
        member.member_id = self.next_member_id;
        member.acquired_seq = self.next_member_id;
        member.slot = slot;
        let id = member.member_id;
        self.members.push(member);
        id
    }

    /// Place the first creature a player owns. It always takes slot 1.
    pub fn add_starter(&mut self, member: PlayerPokemon) -> Result<u64, InputError> {
        if self.has_starter() {
            return Err(InputError::AlreadyHasStarter);
        }
        let id = self.admit(member, Some(STARTER_SLOT));
        info!(member = id, "starter added to slot {}", STARTER_SLOT);
        Ok(id)
    }

    /// Add a later acquisition: the lowest free slot, or storage when the
    /// active roster is full.
    pub fn receive(&mut self, member: PlayerPokemon) -> u64 {
        let slot = self.first_free_slot();
        let id = self.admit(member, slot);
        debug!(member = id, ?slot, "member received");
        id
    }

    /// The six active slots in order, empty ones included.
    pub fn slots(&self) -> Vec<RosterSlot<'_>> {
        (1..=ACTIVE_SLOTS)
            .map(|slot_number| RosterSlot {
                slot_number,
                pokemon: self.occupant(slot_number),
            })
            .collect()
    }

    pub fn move_to_storage(&mut self, member_id: u64) -> Result<(), InputError> {
        let member = self.get_mut(member_id)?;
        if member.slot.is_none() {
            return Err(InputError::AlreadyInStorage);
        }
        member.slot = None;
        debug!(member = member_id, "moved to storage");
        Ok(())
    }

    /// Put a member into a specific slot. The slot must exist and be empty.
    pub fn move_to_slot(&mut self, member_id: u64, slot: u8) -> Result<(), InputError> {
        Self::check_slot(slot)?;
        // The member's own slot counts as occupied too.
        if self.occupant(slot).is_some() {
            return Err(InputError::SlotOccupied(slot));
        }
        let member = self.get_mut(member_id)?;
        member.slot = Some(slot);
        debug!(member = member_id, slot, "moved to slot");
        Ok(())
    }

    /// Bring a stored member back into the active roster, at `slot` or the
    /// lowest free one.
    pub fn move_to_active(&mut self, member_id: u64, slot: Option<u8>) -> Result<u8, InputError> {
        let member = self
            .get(member_id)
            .ok_or(InputError::UnknownMember(member_id))?;
        if member.is_active() {
            return Err(InputError::AlreadyActive);
        }
        if self.active_count() >= ACTIVE_SLOTS as usize {
            return Err(InputError::RosterFull);
        }

        let target = match slot {
            Some(slot) => {
                Self::check_slot(slot)?;
                if self.occupant(slot).is_some() {
                    return Err(InputError::SlotOccupied(slot));
                }
                slot
            }
            None => self.first_free_slot().ok_or(InputError::RosterFull)?,
        };

        self.get_mut(member_id)?.slot = Some(target);
        debug!(member = member_id, slot = target, "moved to active roster");
        Ok(target)
    }

    /// One page of storage, newest acquisitions first.
    ///
    /// `page` starts at 1 (0 reads as 1). `limit` defaults to 20 and is
    /// clamped to 1..=50.
    pub fn storage_page(&self, page: usize, limit: Option<usize>) -> StoragePage<'_> {
        let page = page.max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);

        let mut stored: Vec<&PlayerPokemon> = self.members.iter().filter(|m| !m.is_active()).collect();
        stored.sort_by(|a, b| b.acquired_seq.cmp(&a.acquired_seq));

        let total = stored.len();
        let pokemon = stored
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        StoragePage {
            pokemon,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: total.div_ceil(limit),
            },
        }
    }

    /// Replace a member's moves after checking them against its current
    /// level's move pool.
    pub fn set_moves<P>(&mut self, member_id: u64, provider: &P, moves: Vec<String>) -> EngineResult<()>
    where
        P: ReferenceDataProvider + ?Sized,
    {
        let member = self.get_mut(member_id)?;
        let creature = provider.creature_by_id(&member.pokemon_id)?;
        validate_move_selection(creature, member.level, &moves)?;
        member.selected_moves = Some(moves);
        Ok(())
    }
}
