//! # astral-engine
//!
//! A turn-based spell combat engine for team duels.
//!
//! Players grouped into teams submit one spell per round. The engine
//! validates the moves, resolves them by priority against persistent
//! player state, ticks status effects, and after a fixed number of rounds
//! declares the team with the highest `hp + mana` the winner.
//!
//! ## Design Principles
//!
//! 1. **Read-only tables**: effect kinds, spells and aliases are built
//!    once and looked up through registries that return errors, never
//!    panics.
//!
//! 2. **Clamping lives in `Player`**: spell logic asks for point changes,
//!    `Player` keeps `0 ≤ hp ≤ max_hp` and `0 ≤ mana ≤ max_mana`.
//!
//! 3. **Deterministic**: every chance roll draws from a seeded `GameRng`,
//!    so the same seed and moves replay the same match.
//!
//! ## Modules
//!
//! - `core`: players, teams, match state, RNG, configuration
//! - `effects`: effect kinds, the registry, active effect lists
//! - `spells`: spell definitions, the catalog, references, resolution
//! - `rules`: the rulebook and win evaluation
//! - `engine`: move sources, message sinks, collection, the round loop
//! - `error`: error types

pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod rules;
pub mod spells;

// Re-export commonly used types
pub use crate::core::{
    GameRng, MatchConfig, MatchState, Player, PlayerId, PlayerSnapshot, PlayerStats,
    RngCheckpoint, RoundDeadline, Team, TeamId, TeamSpec,
};

pub use crate::effects::{
    ActiveEffect, ClearMode, EffectDuration, EffectKind, EffectKindId, EffectList,
    EffectRegistry, Polarity, Pulse, ReactionTiming,
};

pub use crate::spells::{
    AliasTable, Outcome, Side, Spell, SpellBehavior, SpellCatalog, SpellCategory, SpellEffect,
    SpellId, SpellLookup, SpellReference, SpellResolver, TargetType,
};

pub use crate::rules::{evaluate_winners, MatchResult, Rulebook};

pub use crate::engine::{
    BufferedSink, MessageSink, Move, MoveCollector, MoveSource, Notice, RawMove, RoundReport,
    ScriptedMoves, TargetRef, TracingSink, TurnEngine, WriterSink,
};

pub use crate::error::{EngineError, MoveError, Result};
