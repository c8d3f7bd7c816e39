//! Players: the mutable combatants of a match.
//!
//! ## PlayerId
//!
//! Position of a player in the match: team plus slot within the team.
//! Stable for the whole match since membership is fixed at setup.
//!
//! ## Player
//!
//! All point changes go through mutators that clamp to
//! `0 ≤ hp ≤ max_hp` and `0 ≤ mana ≤ max_mana` and return the amount
//! actually applied. Reaching zero hp kills the player: mana, armor and
//! every effect are dropped and there is no way back.
//!
//! ## PlayerSnapshot
//!
//! Flat `{max_hp, hp, mana, armor, effects}` record for save/load.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::team::TeamId;
use crate::effects::{
    ActiveEffect, ClearMode, EffectKindId, EffectList, EffectRegistry, Pulse, ReactionTiming,
};
use crate::error::{EngineError, Result};
use crate::spells::SpellId;

/// Mana capacity above max hp.
pub const MANA_HEADROOM: u32 = 10;

/// Player identifier: team plus slot within the team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId {
    pub team: TeamId,
    pub slot: u16,
}

impl PlayerId {
    #[must_use]
    pub const fn new(team: TeamId, slot: u16) -> Self {
        Self { team, slot }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player({}:{})", self.team.raw(), self.slot)
    }
}

/// A combatant.
///
/// ## Example
///
/// ```
/// use astral_engine::core::Player;
///
/// let mut player = Player::new("ann", 30);
/// assert_eq!(player.mana(), 30);
/// assert_eq!(player.max_mana(), 40);
///
/// assert_eq!(player.damage(12), 12);
/// assert_eq!(player.heal(50), 12);
/// assert_eq!(player.hp(), 30);
///
/// player.damage(100);
/// assert!(player.is_dead());
/// assert_eq!(player.score(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    name: String,
    max_hp: u32,
    hp: u32,
    mana: u32,
    armor: u32,
    spells: FxHashMap<SpellId, u32>,
    effects: EffectList,
}

impl Player {
    /// A fresh player at full health with `max_hp` mana.
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: u32) -> Self {
        Self {
            name: name.into(),
            max_hp,
            hp: max_hp,
            mana: max_hp,
            armor: 0,
            spells: FxHashMap::default(),
            effects: EffectList::new(),
        }
    }

    /// Set starting armor (builder pattern).
    #[must_use]
    pub fn with_armor(mut self, armor: u32) -> Self {
        self.armor = armor;
        self
    }

    /// Give one copy of each spell (builder pattern).
    #[must_use]
    pub fn with_spells(mut self, spells: impl IntoIterator<Item = SpellId>) -> Self {
        for id in spells {
            *self.spells.entry(id).or_insert(0) += 1;
        }
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    #[must_use]
    pub fn hp(&self) -> u32 {
        self.hp
    }

    #[must_use]
    pub fn mana(&self) -> u32 {
        self.mana
    }

    #[must_use]
    pub fn max_mana(&self) -> u32 {
        self.max_hp.saturating_add(MANA_HEADROOM)
    }

    #[must_use]
    pub fn armor(&self) -> u32 {
        self.armor
    }

    #[must_use]
    pub fn effects(&self) -> &EffectList {
        &self.effects
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// `hp + mana` while alive, 0 once dead.
    #[must_use]
    pub fn score(&self) -> u64 {
        if self.is_alive() {
            u64::from(self.hp) + u64::from(self.mana)
        } else {
            0
        }
    }

    // === Points ===

    /// Deal damage. Returns the hp actually lost.
    pub fn damage(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        if self.hp == 0 {
            self.kill();
        }
        dealt
    }

    /// Heal up to max hp. Returns the hp actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// Restore mana up to max mana. Returns the mana actually gained.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let restored = amount.min(self.max_mana().saturating_sub(self.mana));
        self.mana += restored;
        restored
    }

    /// Burn mana down to zero. Returns the mana actually lost.
    pub fn burn_mana(&mut self, amount: u32) -> u32 {
        let burned = amount.min(self.mana);
        self.mana -= burned;
        burned
    }

    /// Returns the armor actually gained.
    pub fn add_armor(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let before = self.armor;
        self.armor = self.armor.saturating_add(amount);
        self.armor - before
    }

    /// Returns the armor actually lost.
    pub fn remove_armor(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.armor);
        self.armor -= removed;
        removed
    }

    /// Raise max hp without healing. Returns the increase.
    pub fn add_max_hp(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let before = self.max_hp;
        self.max_hp = self.max_hp.saturating_add(amount);
        self.max_hp - before
    }

    /// Lower max hp, pulling hp and mana down with it.
    ///
    /// Dropping max hp to zero kills the player. Returns the decrease.
    pub fn sub_max_hp(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.max_hp);
        self.max_hp -= removed;
        self.hp = self.hp.min(self.max_hp);
        self.mana = self.mana.min(self.max_mana());
        if self.hp == 0 {
            self.kill();
        }
        removed
    }

    /// Enter the dead state.
    ///
    /// Zeroes hp, mana and armor and drops every effect regardless of
    /// flags. Idempotent; returns true only on the first call.
    pub fn kill(&mut self) -> bool {
        let was_alive =
            self.is_alive() || self.mana > 0 || self.armor > 0 || !self.effects.is_empty();
        self.hp = 0;
        self.mana = 0;
        self.armor = 0;
        self.effects.take_all();
        if was_alive {
            debug!(player = %self.name, "player died");
        }
        was_alive
    }

    /// Apply a pulse: heal, mana restore, mana burn, then damage.
    ///
    /// Returns the amounts actually applied.
    pub fn apply_pulse(&mut self, pulse: Pulse) -> Pulse {
        Pulse {
            heal: self.heal(pulse.heal),
            mana_restore: self.restore_mana(pulse.mana_restore),
            mana_burn: self.burn_mana(pulse.mana_burn),
            damage: self.damage(pulse.damage),
        }
    }

    // === Effects ===

    /// Attach an effect as the newest entry.
    ///
    /// The kind must be registered. Dead players take no effects;
    /// returns whether the effect was attached.
    pub fn add_effect(&mut self, registry: &EffectRegistry, effect: ActiveEffect) -> Result<bool> {
        registry.get(effect.kind)?;
        if self.is_dead() {
            return Ok(false);
        }
        self.effects.push(effect);
        Ok(true)
    }

    /// Remove the oldest instance of `kind` that `mode` allows.
    pub fn remove_effect(
        &mut self,
        registry: &EffectRegistry,
        kind: EffectKindId,
        mode: ClearMode,
    ) -> Result<Option<ActiveEffect>> {
        self.effects.remove_kind(registry, kind, mode)
    }

    pub fn remove_oldest_effect(
        &mut self,
        registry: &EffectRegistry,
        mode: ClearMode,
    ) -> Result<Option<ActiveEffect>> {
        self.effects.remove_oldest(registry, mode)
    }

    pub fn remove_newest_effect(
        &mut self,
        registry: &EffectRegistry,
        mode: ClearMode,
    ) -> Result<Option<ActiveEffect>> {
        self.effects.remove_newest(registry, mode)
    }

    /// Remove every effect `mode` allows.
    pub fn clear_effects(
        &mut self,
        registry: &EffectRegistry,
        mode: ClearMode,
    ) -> Result<Vec<ActiveEffect>> {
        self.effects.clear(registry, mode)
    }

    /// End-of-round duration tick. Returns the expired effects.
    pub fn tick_effects(&mut self, registry: &EffectRegistry) -> Result<Vec<ActiveEffect>> {
        self.effects.tick(registry)
    }

    /// Held back by a live incapacitating effect.
    pub fn is_incapacitated(&self, registry: &EffectRegistry) -> Result<bool> {
        for effect in self.effects.live() {
            if registry.get(effect.kind)?.incapacitating {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Alive and not incapacitated.
    pub fn can_act(&self, registry: &EffectRegistry) -> Result<bool> {
        Ok(self.is_alive() && !self.is_incapacitated(registry)?)
    }

    /// Pulses of live effects reacting at `timing`, oldest first.
    pub fn pulses(
        &self,
        registry: &EffectRegistry,
        timing: ReactionTiming,
    ) -> Result<Vec<(EffectKindId, Pulse)>> {
        let mut pulses = Vec::new();
        for effect in self.effects.live() {
            let kind = registry.get(effect.kind)?;
            if kind.timing != timing {
                continue;
            }
            if let Some(pulse) = kind.pulse {
                pulses.push((effect.kind, pulse));
            }
        }
        Ok(pulses)
    }

    // === Spell inventory ===

    #[must_use]
    pub fn spell_count(&self, id: SpellId) -> u32 {
        self.spells.get(&id).copied().unwrap_or(0)
    }

    /// Held spells with their counts, sorted by ID.
    #[must_use]
    pub fn spells(&self) -> Vec<(SpellId, u32)> {
        let mut spells: Vec<_> = self.spells.iter().map(|(id, n)| (*id, *n)).collect();
        spells.sort();
        spells
    }

    /// Total number of spell copies held.
    #[must_use]
    pub fn spell_total(&self) -> u32 {
        self.spells.values().sum()
    }

    /// Add copies of a spell. Returns the new count.
    pub fn add_spell(&mut self, id: SpellId, count: u32) -> Result<u32> {
        if count == 0 {
            return Err(EngineError::Invariant(format!(
                "cannot add zero copies of spell {}",
                id
            )));
        }
        let held = self.spells.entry(id).or_insert(0);
        *held = held.saturating_add(count);
        Ok(*held)
    }

    /// Remove up to `count` copies. Returns how many were removed.
    pub fn remove_spell(&mut self, id: SpellId, count: u32) -> Result<u32> {
        if count == 0 {
            return Err(EngineError::Invariant(format!(
                "cannot remove zero copies of spell {}",
                id
            )));
        }
        let Some(held) = self.spells.get_mut(&id) else {
            return Ok(0);
        };
        let removed = count.min(*held);
        *held -= removed;
        if *held == 0 {
            self.spells.remove(&id);
        }
        Ok(removed)
    }

    /// Drop the whole inventory, returning it sorted by ID.
    pub fn clear_spells(&mut self) -> Vec<(SpellId, u32)> {
        let spells = self.spells();
        self.spells.clear();
        spells
    }

    // === Snapshots ===

    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            max_hp: self.max_hp,
            hp: self.hp,
            mana: self.mana,
            armor: self.armor,
            effects: self.effects.iter().cloned().collect(),
        }
    }

    /// Overwrite points and effects from a snapshot.
    ///
    /// The snapshot is validated first; name and spells are kept.
    pub fn load(&mut self, registry: &EffectRegistry, snapshot: &PlayerSnapshot) -> Result<()> {
        snapshot.validate(registry)?;
        self.max_hp = snapshot.max_hp;
        self.hp = snapshot.hp;
        self.mana = snapshot.mana;
        self.armor = snapshot.armor;
        self.effects = snapshot.effects.iter().cloned().collect();
        Ok(())
    }

    /// Build a player with an empty inventory from a snapshot.
    pub fn from_snapshot(
        name: impl Into<String>,
        registry: &EffectRegistry,
        snapshot: &PlayerSnapshot,
    ) -> Result<Self> {
        let mut player = Self::new(name, snapshot.max_hp);
        player.load(registry, snapshot)?;
        Ok(player)
    }
}

/// Persisted player record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub max_hp: u32,
    pub hp: u32,
    pub mana: u32,
    pub armor: u32,
    /// Oldest first.
    pub effects: Vec<ActiveEffect>,
}

impl PlayerSnapshot {
    /// Check the player invariants hold for this record.
    pub fn validate(&self, registry: &EffectRegistry) -> Result<()> {
        if self.hp > self.max_hp {
            return Err(EngineError::Invariant(format!(
                "snapshot hp {} exceeds max hp {}",
                self.hp, self.max_hp
            )));
        }
        let max_mana = self.max_hp.saturating_add(MANA_HEADROOM);
        if self.mana > max_mana {
            return Err(EngineError::Invariant(format!(
                "snapshot mana {} exceeds max mana {}",
                self.mana, max_mana
            )));
        }
        if self.hp == 0 && (self.mana > 0 || self.armor > 0 || !self.effects.is_empty()) {
            return Err(EngineError::Invariant(
                "dead snapshot carries mana, armor or effects".into(),
            ));
        }
        for effect in &self.effects {
            registry.get(effect.kind)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
