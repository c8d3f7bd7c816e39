//! Effect kind definitions - static effect data.
//!
//! An `EffectKind` describes what a status effect *is* (can it be
//! dispelled, is it good or bad, when does it react). Which players
//! currently carry it, and for how long, lives in `ActiveEffect`.

use serde::{Deserialize, Serialize};

/// Identifier for an effect kind in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectKindId(pub u16);

impl EffectKindId {
    /// Create a new effect kind ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for EffectKindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// Whether an effect helps or hurts its bearer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Buff,
    Debuff,
}

/// When an effect reacts during a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionTiming {
    /// Before moves are collected.
    PreRound,
    /// When the bearer's own move resolves.
    OnAction,
    /// During the end-of-round tick, before durations decrement.
    PostRound,
}

/// Point changes an effect applies to its bearer each time it reacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pulse {
    pub damage: u32,
    pub heal: u32,
    pub mana_burn: u32,
    pub mana_restore: u32,
}

impl Pulse {
    /// A pulse that only deals damage.
    #[must_use]
    pub const fn damage(amount: u32) -> Self {
        Self { damage: amount, heal: 0, mana_burn: 0, mana_restore: 0 }
    }

    /// A pulse that only heals.
    #[must_use]
    pub const fn heal(amount: u32) -> Self {
        Self { damage: 0, heal: amount, mana_burn: 0, mana_restore: 0 }
    }

    /// A pulse that only burns mana.
    #[must_use]
    pub const fn mana_burn(amount: u32) -> Self {
        Self { damage: 0, heal: 0, mana_burn: amount, mana_restore: 0 }
    }

    /// A pulse that only restores mana.
    #[must_use]
    pub const fn mana_restore(amount: u32) -> Self {
        Self { damage: 0, heal: 0, mana_burn: 0, mana_restore: amount }
    }

    /// True if the pulse changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.damage == 0 && self.heal == 0 && self.mana_burn == 0 && self.mana_restore == 0
    }
}

/// Static description of a status effect.
///
/// ## Example
///
/// ```
/// use astral_engine::effects::{EffectKind, EffectKindId, Polarity, Pulse, ReactionTiming};
///
/// let poison = EffectKind::new(EffectKindId::new(7), "Poison", Polarity::Debuff)
///     .with_timing(ReactionTiming::PostRound)
///     .with_pulse(Pulse::damage(2));
///
/// assert!(poison.clearable);
/// assert_eq!(poison.pulse, Some(Pulse::damage(2)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectKind {
    pub id: EffectKindId,

    /// Display title (for debugging/display).
    pub title: String,

    /// Can a normal (non-hard) dispel remove this effect?
    pub clearable: bool,

    pub polarity: Polarity,

    pub timing: ReactionTiming,

    /// Bearer is skipped when eligible casters are computed.
    pub incapacitating: bool,

    /// Points applied each time the effect reacts. `None` for marker effects.
    pub pulse: Option<Pulse>,
}

impl EffectKind {
    /// Create a clearable marker effect reacting before the round.
    pub fn new(id: EffectKindId, title: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            id,
            title: title.into(),
            clearable: true,
            polarity,
            timing: ReactionTiming::PreRound,
            incapacitating: false,
            pulse: None,
        }
    }

    /// Only a hard dispel can remove this effect.
    #[must_use]
    pub fn unclearable(mut self) -> Self {
        self.clearable = false;
        self
    }

    /// Set the reaction timing.
    #[must_use]
    pub fn with_timing(mut self, timing: ReactionTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Set the pulse applied at the reaction timing.
    #[must_use]
    pub fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = Some(pulse);
        self
    }

    /// Bearer cannot cast while the effect is live.
    #[must_use]
    pub fn incapacitating(mut self) -> Self {
        self.incapacitating = true;
        self
    }
}
