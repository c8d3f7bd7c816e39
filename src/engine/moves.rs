//! Moves: what a player submits, and what the engine accepts.
//!
//! A `RawMove` is three untrusted strings as typed by a player. The
//! collector validates it into a `Move`, with every name resolved to a
//! `PlayerId` and the spell token to a `SpellId`.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::spells::SpellId;

/// Target part of a raw move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    /// No target named.
    Implicit,
    Single(String),
    Many(Vec<String>),
}

impl TargetRef {
    /// Named targets, in the order given.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            TargetRef::Implicit => Vec::new(),
            TargetRef::Single(name) => vec![name.as_str()],
            TargetRef::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    #[must_use]
    pub fn is_implicit(&self) -> bool {
        matches!(self, TargetRef::Implicit)
    }
}

/// An unvalidated move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMove {
    pub caster: String,
    pub spell: String,
    pub target: TargetRef,
}

impl RawMove {
    /// A move with no named target.
    #[must_use]
    pub fn new(caster: impl Into<String>, spell: impl Into<String>) -> Self {
        Self {
            caster: caster.into(),
            spell: spell.into(),
            target: TargetRef::Implicit,
        }
    }

    /// Name one target (builder pattern).
    #[must_use]
    pub fn at(mut self, target: impl Into<String>) -> Self {
        self.target = TargetRef::Single(target.into());
        self
    }

    /// Name several targets (builder pattern).
    #[must_use]
    pub fn at_all(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.target = TargetRef::Many(targets.into_iter().map(Into::into).collect());
        self
    }

    /// Parse `caster spell [target[,target...]]`.
    ///
    /// Returns `None` for anything that is not two or three
    /// whitespace-separated tokens.
    ///
    /// ```
    /// use astral_engine::engine::{RawMove, TargetRef};
    ///
    /// let mv = RawMove::parse("ann 11 bob").unwrap();
    /// assert_eq!(mv.target, TargetRef::Single("bob".into()));
    ///
    /// let mv = RawMove::parse("ann heal amy,ann").unwrap();
    /// assert_eq!(mv.target.names(), vec!["amy", "ann"]);
    ///
    /// assert!(RawMove::parse("ann").is_none());
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [caster, spell] => Some(Self::new(*caster, *spell)),
            [caster, spell, targets] => {
                let names: Vec<&str> = targets
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect();
                let target = match names.as_slice() {
                    [] => return None,
                    [single] => TargetRef::Single((*single).to_string()),
                    many => TargetRef::Many(many.iter().map(|n| (*n).to_string()).collect()),
                };
                Some(Self {
                    caster: (*caster).to_string(),
                    spell: (*spell).to_string(),
                    target,
                })
            }
            _ => None,
        }
    }
}

/// A validated move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Cast {
        caster: PlayerId,
        spell: SpellId,
        /// Named targets; empty for caster-only and massive spells.
        targets: Vec<PlayerId>,
    },
    /// Substituted for a caster who ran out of time. Never resolved.
    Pass { caster: PlayerId },
}

impl Move {
    #[must_use]
    pub fn caster(&self) -> PlayerId {
        match self {
            Move::Cast { caster, .. } | Move::Pass { caster } => *caster,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass { .. })
    }
}
