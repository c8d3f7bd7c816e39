//! Spell catalog for definition lookup.
//!
//! The `SpellCatalog` stores every spell a match can use, keyed by
//! `SpellId`. It is built once and only read afterwards.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::definition::{Spell, SpellId};
use super::standard;
use crate::error::{EngineError, Result};

/// Registry of spell definitions.
///
/// ## Example
///
/// ```
/// use astral_engine::spells::{Spell, SpellBehavior, SpellCatalog, SpellId, TargetType};
///
/// let mut catalog = SpellCatalog::new();
/// let id = SpellId::new(0, 5);
/// let suicide = Spell::new(id, "Suicide", 1, TargetType::Caster, SpellBehavior::Kill);
/// catalog.register(suicide).unwrap();
///
/// assert_eq!(catalog.get(SpellId::new(0, 5)).unwrap().title, "Suicide");
/// assert!(catalog.get(SpellId::new(9, 9)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpellCatalog {
    spells: FxHashMap<SpellId, Spell>,
}

impl SpellCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard spell book, built on first use.
    #[must_use]
    pub fn standard() -> &'static SpellCatalog {
        static STANDARD: OnceLock<SpellCatalog> = OnceLock::new();
        STANDARD.get_or_init(standard::spells)
    }

    /// Register a spell.
    ///
    /// Fails if a spell with the same ID is already registered.
    pub fn register(&mut self, spell: Spell) -> Result<()> {
        if self.spells.contains_key(&spell.id) {
            return Err(EngineError::Configuration(format!(
                "spell {} already registered",
                spell.id
            )));
        }
        self.spells.insert(spell.id, spell);
        Ok(())
    }

    /// Get a spell by ID.
    pub fn get(&self, id: SpellId) -> Result<&Spell> {
        self.spells.get(&id).ok_or(EngineError::UnknownSpell(id))
    }

    /// Check if a spell ID is registered.
    #[must_use]
    pub fn contains(&self, id: SpellId) -> bool {
        self.spells.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// All spell IDs, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<SpellId> {
        let mut ids: Vec<_> = self.spells.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Spells of one level, sorted by index.
    pub fn level(&self, level: u8) -> impl Iterator<Item = &Spell> {
        let mut spells: Vec<_> = self.spells.values().filter(|s| s.id.level == level).collect();
        spells.sort_by_key(|s| s.id);
        spells.into_iter()
    }
}
