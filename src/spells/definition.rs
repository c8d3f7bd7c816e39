//! Spell definitions - static spell data.
//!
//! A `Spell` is keyed by `(level, index)` and carries its resolution
//! priority, target constraint, and behavior. Spells are immutable once
//! registered in a `SpellCatalog`.

use serde::{Deserialize, Serialize};

use super::behavior::SpellBehavior;
use super::targeting::TargetType;

/// Identifier for a spell: `(level, index)`.
///
/// Displays as `{level}{index}`, the same form players type.
///
/// ```
/// use astral_engine::spells::SpellId;
///
/// assert_eq!(SpellId::new(1, 12).to_string(), "112");
/// assert_eq!(SpellId::new(0, 5).to_string(), "05");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId {
    pub level: u8,
    pub index: u16,
}

impl SpellId {
    #[must_use]
    pub const fn new(level: u8, index: u16) -> Self {
        Self { level, index }
    }
}

impl std::fmt::Display for SpellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.level, self.index)
    }
}

/// Broad category of a spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellCategory {
    Attack,
    /// Beneficial spells. Dead players are never valid targets.
    Defence,
    Neutral,
}

/// Static spell definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub id: SpellId,

    /// Display title (for debugging/display).
    pub title: String,

    /// Higher priority resolves earlier within a round.
    pub priority: i32,

    pub target_type: TargetType,

    pub category: SpellCategory,

    pub behavior: SpellBehavior,
}

impl Spell {
    /// Create a neutral spell.
    pub fn new(
        id: SpellId,
        title: impl Into<String>,
        priority: i32,
        target_type: TargetType,
        behavior: SpellBehavior,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            priority,
            target_type,
            category: SpellCategory::Neutral,
            behavior,
        }
    }

    /// Set the category (builder pattern).
    #[must_use]
    pub fn with_category(mut self, category: SpellCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn is_beneficial(&self) -> bool {
        self.category == SpellCategory::Defence
    }
}
