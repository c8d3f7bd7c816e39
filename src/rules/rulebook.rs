//! The rulebook: every read-only table a match consults.

use crate::effects::EffectRegistry;
use crate::error::{EngineError, MoveError, Result};
use crate::spells::{
    resolve_reference, AliasTable, Spell, SpellBehavior, SpellCatalog, SpellId, SpellLookup,
    SpellReference,
};

/// Effect kinds, spells and spell aliases of a match.
///
/// Spell tokens resolve through the numeric catalog first, then the
/// alias table.
///
/// ## Example
///
/// ```
/// use astral_engine::rules::Rulebook;
/// use astral_engine::spells::standard;
///
/// let rules = Rulebook::standard();
/// assert_eq!(rules.resolve_spell("124").unwrap(), standard::MAGIC_SHIELD_SPELL);
/// assert_eq!(rules.resolve_spell("shield").unwrap(), standard::MAGIC_SHIELD_SPELL);
/// assert!(rules.resolve_spell("999").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Rulebook {
    pub effects: EffectRegistry,
    pub spells: SpellCatalog,
    pub aliases: AliasTable,
}

impl Rulebook {
    /// Assemble a rulebook, checking every spell grant names a known effect.
    pub fn new(effects: EffectRegistry, spells: SpellCatalog, aliases: AliasTable) -> Result<Self> {
        let rules = Self {
            effects,
            spells,
            aliases,
        };
        rules.check_grants()?;
        Ok(rules)
    }

    /// The standard effects, spell book and English aliases.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            effects: EffectRegistry::standard().clone(),
            spells: SpellCatalog::standard().clone(),
            aliases: AliasTable::standard(),
        }
    }

    /// Resolve a typed spell token.
    pub fn resolve_spell(&self, token: &str) -> std::result::Result<SpellId, MoveError> {
        let reference = SpellReference::parse(token);
        let lookups: [&dyn SpellLookup; 2] = [&self.spells, &self.aliases];
        resolve_reference(&reference, &lookups)
            .ok_or_else(|| MoveError::UnknownSpell(token.trim().to_string()))
    }

    pub fn spell(&self, id: SpellId) -> Result<&Spell> {
        self.spells.get(id)
    }

    fn check_grants(&self) -> Result<()> {
        for id in self.spells.ids() {
            let spell = self.spells.get(id)?;
            let grants = match &spell.behavior {
                SpellBehavior::Generic(bag) => bag.grants.clone(),
                SpellBehavior::Defence { ward, .. } => vec![*ward],
                _ => Vec::new(),
            };
            if let Some(grant) = grants.iter().find(|g| !self.effects.contains(g.kind)) {
                return Err(EngineError::Configuration(format!(
                    "spell {} grants unregistered {}",
                    id, grant.kind
                )));
            }
        }
        Ok(())
    }
}
