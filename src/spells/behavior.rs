//! Spell behaviors.
//!
//! Most spells are data: a `SpellEffect` bag of point changes and effect
//! grants, interpreted by the generic resolver. The few spells whose
//! effect is structural (killing, dispelling, reshuffling the inventory,
//! the defensive strip) get a dedicated `SpellBehavior` variant.

use serde::{Deserialize, Serialize};

use crate::effects::{ActiveEffect, ClearMode, EffectDuration, EffectKindId};

/// An effect a spell attaches to its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectGrant {
    pub kind: EffectKindId,
    pub duration: EffectDuration,
    pub locked: bool,
}

impl EffectGrant {
    /// Grant `kind` for `rounds` ticks.
    #[must_use]
    pub const fn rounds(kind: EffectKindId, rounds: u32) -> Self {
        Self {
            kind,
            duration: EffectDuration::Rounds(rounds),
            locked: false,
        }
    }

    /// Grant `kind` until it is cleared.
    #[must_use]
    pub const fn persistent(kind: EffectKindId) -> Self {
        Self {
            kind,
            duration: EffectDuration::UntilCleared,
            locked: false,
        }
    }

    /// Lock the granted instance.
    #[must_use]
    pub const fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// The instance this grant attaches.
    #[must_use]
    pub fn instance(&self) -> ActiveEffect {
        ActiveEffect {
            kind: self.kind,
            remaining: self.duration,
            locked: self.locked,
        }
    }
}

/// Declarative bag of point changes and effect grants.
///
/// Applied to each target in field order: max hp, heal, damage, mana
/// restore, mana burn, armor, then grants.
///
/// ```
/// use astral_engine::spells::SpellEffect;
///
/// let first_aid = SpellEffect::new().raise_max_hp(2).heal(4);
/// assert_eq!(first_aid.heal, 4);
/// assert!(first_aid.grants.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellEffect {
    pub max_hp_gain: u32,
    pub heal: u32,
    pub damage: u32,
    pub mana_restore: u32,
    pub mana_burn: u32,
    pub armor_gain: u32,
    pub armor_loss: u32,
    pub grants: Vec<EffectGrant>,
}

impl SpellEffect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raise_max_hp(mut self, amount: u32) -> Self {
        self.max_hp_gain = amount;
        self
    }

    #[must_use]
    pub fn heal(mut self, amount: u32) -> Self {
        self.heal = amount;
        self
    }

    #[must_use]
    pub fn damage(mut self, amount: u32) -> Self {
        self.damage = amount;
        self
    }

    #[must_use]
    pub fn restore_mana(mut self, amount: u32) -> Self {
        self.mana_restore = amount;
        self
    }

    #[must_use]
    pub fn burn_mana(mut self, amount: u32) -> Self {
        self.mana_burn = amount;
        self
    }

    #[must_use]
    pub fn add_armor(mut self, amount: u32) -> Self {
        self.armor_gain = amount;
        self
    }

    #[must_use]
    pub fn remove_armor(mut self, amount: u32) -> Self {
        self.armor_loss = amount;
        self
    }

    #[must_use]
    pub fn grant(mut self, grant: EffectGrant) -> Self {
        self.grants.push(grant);
        self
    }
}

/// How a spell resolves against its targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpellBehavior {
    /// Interpret a declarative effect bag.
    Generic(SpellEffect),

    /// Kill each target outright.
    Kill,

    /// Clear every effect the mode allows from each target.
    Dispel(ClearMode),

    /// Replace the target's whole inventory with as many random spells.
    Shuffle,

    /// Grant `ward`, stripping the oldest clearable effect first.
    ///
    /// The strip is certain when the target already holds `threshold` or
    /// more effects, otherwise it happens with probability `strip_chance`.
    Defence {
        ward: EffectGrant,
        threshold: usize,
        strip_chance: f64,
    },
}
