//! Status effect system.
//!
//! - `EffectKind`: static description of an effect (clearable, polarity,
//!   reaction timing, optional pulse)
//! - `EffectRegistry`: read-only kind lookup, built once
//! - `ActiveEffect` / `EffectList`: effect instances attached to a player,
//!   with duration ticking and dispel rules
//!
//! ## Dispel rules
//!
//! A [`ClearMode::Normal`] clear removes an effect only if its kind is
//! clearable and the instance is not locked. [`ClearMode::Hard`] removes
//! everything. The end-of-round tick applies the normal rule to effects
//! whose duration runs out.

mod active;
mod kind;
mod registry;
pub mod standard;

pub use active::{ActiveEffect, ClearMode, EffectDuration, EffectList};
pub use kind::{EffectKind, EffectKindId, Polarity, Pulse, ReactionTiming};
pub use registry::EffectRegistry;
