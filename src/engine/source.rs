//! Move sources: where the engine gets moves from.
//!
//! The engine asks a `MoveSource` for moves until every eligible caster
//! has one. A source may be a prompt, a network session, or a script;
//! the engine only sees synchronous request/response calls.

use std::collections::VecDeque;
use std::time::Duration;

use super::moves::RawMove;

/// Supplies raw moves on request.
pub trait MoveSource {
    /// Next submission. `pending` names the casters still owed a move.
    ///
    /// `budget` is the time left before the round closes, `None` when the
    /// round has no wall-clock limit. A source must return within the
    /// budget; returning `None` once it has run out closes the round and
    /// every pending caster passes. Any other `None` is an empty
    /// submission and counts as an invalid move.
    fn get_move(&mut self, pending: &[String], budget: Option<Duration>) -> Option<RawMove>;

    /// No further submissions will ever arrive.
    ///
    /// Pending casters pass instead of being asked again.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Plays back a fixed list of text lines, one per request.
///
/// Lines use the `caster spell [targets]` grammar; unparseable lines are
/// empty submissions. Once the script runs out the source is exhausted.
///
/// ## Example
///
/// ```
/// use astral_engine::engine::{MoveSource, ScriptedMoves};
///
/// let mut script = ScriptedMoves::new(["ann 01", "nonsense"]);
/// assert!(script.get_move(&[], None).is_some());
/// assert!(script.get_move(&[], None).is_none());
/// assert!(script.is_exhausted());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedMoves {
    lines: VecDeque<String>,
    served: usize,
}

impl ScriptedMoves {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            served: 0,
        }
    }

    /// Append more lines.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Lines not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Lines served so far.
    #[must_use]
    pub fn served(&self) -> usize {
        self.served
    }
}

impl MoveSource for ScriptedMoves {
    fn get_move(&mut self, _pending: &[String], _budget: Option<Duration>) -> Option<RawMove> {
        let line = self.lines.pop_front()?;
        self.served += 1;
        RawMove::parse(&line)
    }

    fn is_exhausted(&self) -> bool {
        self.lines.is_empty()
    }
}
