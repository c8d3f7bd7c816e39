//! Match rules: the read-only tables and the scoring rules.
//!
//! - `Rulebook`: effect registry, spell catalog and alias table, with
//!   spell-token resolution
//! - `evaluate_winners`: running-maximum winner selection over team scores

pub mod rulebook;
pub mod scoring;

pub use rulebook::Rulebook;
pub use scoring::{evaluate, evaluate_winners, standings, MatchResult};
