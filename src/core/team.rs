//! Teams: fixed groups of players scored together.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::effects::EffectRegistry;
use crate::error::{EngineError, Result};

/// Team identifier: position of the team in the match (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u8);

impl TeamId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// A titled group of players with unique names.
///
/// Members keep the slot they were added at.
///
/// ## Example
///
/// ```
/// use astral_engine::core::{Player, Team};
///
/// let mut team = Team::new("Owls");
/// team.add(Player::new("ann", 30)).unwrap();
/// team.add(Player::new("bob", 30)).unwrap();
///
/// assert!(team.add(Player::new("ann", 30)).is_err());
/// assert_eq!(team.score(), 120);
/// ```
#[derive(Clone, Debug)]
pub struct Team {
    title: String,
    members: Vec<Player>,
    slots: FxHashMap<String, u16>,
}

impl Team {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            members: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    /// Add a member (builder pattern).
    pub fn with_member(mut self, player: Player) -> Result<Self> {
        self.add(player)?;
        Ok(self)
    }

    /// Add a member, returning its slot.
    ///
    /// Names must be unique within the team.
    pub fn add(&mut self, player: Player) -> Result<u16> {
        if self.slots.contains_key(player.name()) {
            return Err(EngineError::Configuration(format!(
                "team {} already has a player named {}",
                self.title,
                player.name()
            )));
        }
        let slot = u16::try_from(self.members.len()).map_err(|_| {
            EngineError::Configuration(format!("team {} is full", self.title))
        })?;
        self.slots.insert(player.name().to_string(), slot);
        self.members.push(player);
        Ok(slot)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Slot of the member called `name`.
    #[must_use]
    pub fn slot_of(&self, name: &str) -> Option<u16> {
        self.slots.get(name).copied()
    }

    /// Get a member by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Player> {
        self.slot_of(name).and_then(|slot| self.member(slot))
    }

    #[must_use]
    pub fn member(&self, slot: u16) -> Option<&Player> {
        self.members.get(usize::from(slot))
    }

    pub fn member_mut(&mut self, slot: u16) -> Option<&mut Player> {
        self.members.get_mut(usize::from(slot))
    }

    /// Members in slot order.
    pub fn members(&self) -> impl Iterator<Item = &Player> {
        self.members.iter()
    }

    pub fn alive_members(&self) -> impl Iterator<Item = &Player> {
        self.members.iter().filter(|p| p.is_alive())
    }

    /// Members able to cast this round: alive and not incapacitated.
    pub fn active_members(&self, registry: &EffectRegistry) -> Result<Vec<&Player>> {
        let mut active = Vec::new();
        for player in &self.members {
            if player.can_act(registry)? {
                active.push(player);
            }
        }
        Ok(active)
    }

    /// Nobody left standing.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.alive_members().next().is_none()
    }

    /// Sum of member scores.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.members.iter().map(Player::score).sum()
    }
}
