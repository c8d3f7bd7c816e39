//! Effect registry for kind lookup.
//!
//! The `EffectRegistry` stores every effect kind a match can use.
//! It is built once and only read afterwards; lookups of unknown
//! ids return `EngineError::UnknownEffect`.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::kind::{EffectKind, EffectKindId};
use super::standard;
use crate::error::{EngineError, Result};

/// Registry of effect kinds.
///
/// ## Example
///
/// ```
/// use astral_engine::effects::{EffectKind, EffectKindId, EffectRegistry, Polarity};
///
/// let mut registry = EffectRegistry::new();
/// registry
///     .register(EffectKind::new(EffectKindId::new(1), "Levitate", Polarity::Debuff))
///     .unwrap();
///
/// assert_eq!(registry.get(EffectKindId::new(1)).unwrap().title, "Levitate");
/// assert!(registry.get(EffectKindId::new(2)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    kinds: FxHashMap<EffectKindId, EffectKind>,
}

impl EffectRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard effect kinds, built on first use.
    #[must_use]
    pub fn standard() -> &'static EffectRegistry {
        static STANDARD: OnceLock<EffectRegistry> = OnceLock::new();
        STANDARD.get_or_init(standard::effects)
    }

    /// Register an effect kind.
    ///
    /// Fails if a kind with the same ID is already registered.
    pub fn register(&mut self, kind: EffectKind) -> Result<()> {
        if self.kinds.contains_key(&kind.id) {
            return Err(EngineError::Configuration(format!(
                "effect kind {} already registered",
                kind.id
            )));
        }
        self.kinds.insert(kind.id, kind);
        Ok(())
    }

    /// Get an effect kind by ID.
    pub fn get(&self, id: EffectKindId) -> Result<&EffectKind> {
        self.kinds.get(&id).ok_or(EngineError::UnknownEffect(id))
    }

    /// Check if an effect kind is registered.
    #[must_use]
    pub fn contains(&self, id: EffectKindId) -> bool {
        self.kinds.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over all effect kinds, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectKind> {
        let mut kinds: Vec<_> = self.kinds.values().collect();
        kinds.sort_by_key(|k| k.id);
        kinds.into_iter()
    }
}
