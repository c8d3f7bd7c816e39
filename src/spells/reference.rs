//! Spell references typed by players.
//!
//! A token is either numeric, `{level}{index}` (one level digit, the
//! remaining digits are the index), or an alias. Parsing produces one
//! `SpellReference`; any number of `SpellLookup` implementations then
//! try to resolve it, first hit wins.

use rustc_hash::FxHashMap;

use super::catalog::SpellCatalog;
use super::definition::SpellId;
use super::standard;

/// A parsed spell token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpellReference {
    Numeric(SpellId),
    /// Lower-cased alias text.
    Alias(String),
}

impl SpellReference {
    /// Parse a token.
    ///
    /// ```
    /// use astral_engine::spells::{SpellId, SpellReference};
    ///
    /// assert_eq!(SpellReference::parse("112"), SpellReference::Numeric(SpellId::new(1, 12)));
    /// assert_eq!(SpellReference::parse("Heal"), SpellReference::Alias("heal".into()));
    /// ```
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.len() >= 2 && token.bytes().all(|b| b.is_ascii_digit()) {
            let level = token.as_bytes()[0] - b'0';
            if let Ok(index) = token[1..].parse::<u16>() {
                return SpellReference::Numeric(SpellId::new(level, index));
            }
        }
        SpellReference::Alias(token.to_lowercase())
    }
}

impl std::fmt::Display for SpellReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpellReference::Numeric(id) => write!(f, "{}", id),
            SpellReference::Alias(alias) => write!(f, "{}", alias),
        }
    }
}

/// Something that can turn a reference into a spell ID.
pub trait SpellLookup {
    fn lookup(&self, reference: &SpellReference) -> Option<SpellId>;
}

impl SpellLookup for SpellCatalog {
    fn lookup(&self, reference: &SpellReference) -> Option<SpellId> {
        match reference {
            SpellReference::Numeric(id) if self.contains(*id) => Some(*id),
            _ => None,
        }
    }
}

/// Resolve `reference` through `lookups` in order.
#[must_use]
pub fn resolve_reference(
    reference: &SpellReference,
    lookups: &[&dyn SpellLookup],
) -> Option<SpellId> {
    lookups.iter().find_map(|l| l.lookup(reference))
}

/// Alias → spell table, case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: FxHashMap<String, SpellId>,
}

impl AliasTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Short English aliases for the standard spell book.
    #[must_use]
    pub fn standard() -> Self {
        [
            ("meditate", standard::MEDITATION),
            ("run", standard::RUN),
            ("defend", standard::DEFENCE),
            ("fly", standard::LEVITATION),
            ("suicide", standard::SUICIDE),
            ("fortune", standard::FORTUNE),
            ("aid", standard::FIRST_AID),
            ("arrow", standard::FIRE_ARROW),
            ("spit", standard::POISON_SPIT),
            ("heal", standard::HEALING),
            ("nightmare", standard::NIGHTMARE_SPELL),
            ("dispel", standard::DISPELLING),
            ("shield", standard::MAGIC_SHIELD_SPELL),
            ("blizzard", standard::BLIZZARD),
            ("mend", standard::MENDING_AURA),
            ("cataclysm", standard::CATACLYSM),
            ("purge", standard::PURGE),
        ]
        .into_iter()
        .fold(Self::new(), |table, (alias, id)| table.with_alias(alias, id))
    }

    /// Add an alias (builder pattern).
    #[must_use]
    pub fn with_alias(mut self, alias: impl AsRef<str>, id: SpellId) -> Self {
        self.insert(alias, id);
        self
    }

    /// Add or replace an alias.
    pub fn insert(&mut self, alias: impl AsRef<str>, id: SpellId) {
        self.aliases.insert(alias.as_ref().trim().to_lowercase(), id);
    }

    #[must_use]
    pub fn get(&self, alias: &str) -> Option<SpellId> {
        self.aliases.get(&alias.trim().to_lowercase()).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl SpellLookup for AliasTable {
    fn lookup(&self, reference: &SpellReference) -> Option<SpellId> {
        match reference {
            SpellReference::Alias(alias) => self.aliases.get(alias).copied(),
            SpellReference::Numeric(_) => None,
        }
    }
}
