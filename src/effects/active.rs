//! Active effects - effect instances attached to a player.
//!
//! `EffectList` keeps effects in insertion order so "oldest" and
//! "newest" removal are well defined. Lists stay small, so every
//! removal is a linear scan.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::kind::EffectKindId;
use super::registry::EffectRegistry;
use crate::error::Result;

/// How long an active effect lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectDuration {
    /// Ticks remaining. Decremented at the end of every round.
    Rounds(u32),
    /// Stays until explicitly cleared. Never ticked.
    UntilCleared,
}

impl EffectDuration {
    /// Zero ticks left.
    #[must_use]
    pub fn is_spent(self) -> bool {
        self == EffectDuration::Rounds(0)
    }
}

/// Which flags a clear respects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearMode {
    /// Removes only clearable, unlocked effects.
    Normal,
    /// Removes everything.
    Hard,
}

/// An effect instance carried by a player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKindId,
    pub remaining: EffectDuration,
    /// Overrides the kind's clearable flag for this instance.
    pub locked: bool,
}

impl ActiveEffect {
    /// An unlocked effect lasting `rounds` ticks.
    #[must_use]
    pub fn for_rounds(kind: EffectKindId, rounds: u32) -> Self {
        Self {
            kind,
            remaining: EffectDuration::Rounds(rounds),
            locked: false,
        }
    }

    /// An unlocked effect that persists until cleared.
    #[must_use]
    pub fn persistent(kind: EffectKindId) -> Self {
        Self {
            kind,
            remaining: EffectDuration::UntilCleared,
            locked: false,
        }
    }

    /// Lock this instance against normal clears.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// A spent effect is still attached but no longer reacts.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.remaining.is_spent()
    }
}

/// Ordered container of a player's active effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectList {
    entries: SmallVec<[ActiveEffect; 4]>,
}

impl EffectList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect (it becomes the newest).
    ///
    /// A spent instance of the same kind is dropped first, so re-applying
    /// a locked effect re-arms it instead of piling up spent entries.
    pub fn push(&mut self, effect: ActiveEffect) {
        self.entries.retain(|e| e.kind != effect.kind || e.is_live());
        self.entries.push(effect);
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.entries.iter()
    }

    /// Iterate over effects that still react.
    pub fn live(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.entries.iter().filter(|e| e.is_live())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether any instance of `kind` is attached.
    #[must_use]
    pub fn contains(&self, kind: EffectKindId) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Check whether `effect` may be removed under `mode`.
    pub fn can_clear(
        registry: &EffectRegistry,
        effect: &ActiveEffect,
        mode: ClearMode,
    ) -> Result<bool> {
        if mode == ClearMode::Hard {
            return Ok(true);
        }
        let kind = registry.get(effect.kind)?;
        Ok(kind.clearable && !effect.locked)
    }

    /// Remove every effect that `mode` allows, returning them oldest first.
    pub fn clear(
        &mut self,
        registry: &EffectRegistry,
        mode: ClearMode,
    ) -> Result<Vec<ActiveEffect>> {
        let decisions = self
            .entries
            .iter()
            .map(|e| Self::can_clear(registry, e, mode))
            .collect::<Result<Vec<bool>>>()?;

        let mut kept = SmallVec::new();
        let mut removed = Vec::new();
        for (effect, clear) in self.entries.drain(..).zip(decisions) {
            if clear {
                removed.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.entries = kept;
        Ok(removed)
    }

    /// Drop everything regardless of flags.
    pub fn take_all(&mut self) -> Vec<ActiveEffect> {
        self.entries.drain(..).collect()
    }

    /// Remove the oldest effect that `mode` allows.
    pub fn remove_oldest(
        &mut self,
        registry: &EffectRegistry,
        mode: ClearMode,
    ) -> Result<Option<ActiveEffect>> {
        for idx in 0..self.entries.len() {
            if Self::can_clear(registry, &self.entries[idx], mode)? {
                return Ok(Some(self.entries.remove(idx)));
            }
        }
        Ok(None)
    }

    /// Remove the newest effect that `mode` allows.
    pub fn remove_newest(
        &mut self,
        registry: &EffectRegistry,
        mode: ClearMode,
    ) -> Result<Option<ActiveEffect>> {
        for idx in (0..self.entries.len()).rev() {
            if Self::can_clear(registry, &self.entries[idx], mode)? {
                return Ok(Some(self.entries.remove(idx)));
            }
        }
        Ok(None)
    }

    /// Remove the oldest instance of `kind` that `mode` allows.
    pub fn remove_kind(
        &mut self,
        registry: &EffectRegistry,
        kind: EffectKindId,
        mode: ClearMode,
    ) -> Result<Option<ActiveEffect>> {
        for idx in 0..self.entries.len() {
            let effect = &self.entries[idx];
            if effect.kind == kind && Self::can_clear(registry, effect, mode)? {
                return Ok(Some(self.entries.remove(idx)));
            }
        }
        Ok(None)
    }

    /// End-of-round tick.
    ///
    /// Decrements every positive duration. Effects that reach zero are
    /// removed if a normal clear could remove them; locked or unclearable
    /// ones stay attached as spent. Returns the removed effects.
    pub fn tick(&mut self, registry: &EffectRegistry) -> Result<Vec<ActiveEffect>> {
        let mut expired = Vec::new();
        let mut idx = 0;
        while idx < self.entries.len() {
            let effect = &mut self.entries[idx];
            let just_spent = match effect.remaining {
                EffectDuration::Rounds(n) if n > 0 => {
                    effect.remaining = EffectDuration::Rounds(n - 1);
                    n == 1
                }
                _ => false,
            };
            if just_spent && Self::can_clear(registry, &self.entries[idx], ClearMode::Normal)? {
                expired.push(self.entries.remove(idx));
            } else {
                idx += 1;
            }
        }
        Ok(expired)
    }
}

impl FromIterator<ActiveEffect> for EffectList {
    /// Keeps every entry as given, spent ones included.
    fn from_iter<I: IntoIterator<Item = ActiveEffect>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
