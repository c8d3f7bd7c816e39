//! The turn engine and its collaborators.
//!
//! - `MoveSource`: supplies raw moves (prompt, network, script)
//! - `MessageSink`: receives player-facing `Notice`s
//! - `MoveCollector`: validates moves until every eligible caster has one
//! - `TurnEngine`: the round loop and the final win evaluation
//!
//! The engine is single-threaded; the only point where it waits is the
//! move source.

mod collect;
mod messages;
mod moves;
mod source;
mod turn;

pub use collect::MoveCollector;
pub use messages::{BufferedSink, MessageSink, Notice, PassReason, TracingSink, WriterSink};
pub use moves::{Move, RawMove, TargetRef};
pub use source::{MoveSource, ScriptedMoves};
pub use turn::{RoundReport, TurnEngine};
