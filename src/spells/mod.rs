//! Spells: definitions, targeting, the catalog, resolution.
//!
//! - `Spell`: static definition keyed by `SpellId` `(level, index)`
//! - `TargetType`: who a spell may land on
//! - `SpellCatalog`: read-only spell lookup, built once
//! - `SpellReference` / `SpellLookup`: typed player tokens and the
//!   resolvers (numeric catalog, alias table) behind them
//! - `SpellResolver`: applies a cast to match state
//!
//! ## Example
//!
//! ```
//! use astral_engine::spells::{standard, SpellCatalog, TargetType, Side};
//!
//! let arrow = SpellCatalog::standard().get(standard::FIRE_ARROW).unwrap();
//! assert_eq!(arrow.target_type, TargetType::Directed { side: Side::Enemy });
//! assert!(arrow.target_type.requires_explicit_target());
//! ```

mod behavior;
mod catalog;
mod definition;
mod reference;
mod resolver;
pub mod standard;
mod targeting;

pub use behavior::{EffectGrant, SpellBehavior, SpellEffect};
pub use catalog::SpellCatalog;
pub use definition::{Spell, SpellCategory, SpellId};
pub use reference::{resolve_reference, AliasTable, SpellLookup, SpellReference};
pub use resolver::{Outcome, SpellResolver};
pub use targeting::{Side, TargetType};
