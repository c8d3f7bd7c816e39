//! Error types for the duel engine.
//!
//! Two families:
//! - [`MoveError`]: a submitted move was rejected. Recoverable: the caster is
//!   warned and asked again, the round never aborts.
//! - [`EngineError`]: setup or programming errors. Fatal: they propagate out
//!   of the match.

use thiserror::Error;

use crate::effects::EffectKindId;
use crate::spells::SpellId;

/// Why a submitted move was rejected.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    #[error("empty move")]
    EmptyMove,

    #[error("spell {0} does not exist")]
    UnknownSpell(String),

    #[error("player {0} does not exist")]
    UnknownPlayer(String),

    #[error("player {0} cannot make a move this round")]
    IneligibleCaster(String),

    #[error("spell {0} requires a target")]
    MissingTarget(SpellId),

    #[error("player {target} cannot be a target of spell {spell}: {reason}")]
    IllegalTarget {
        target: String,
        spell: SpellId,
        reason: &'static str,
    },
}

impl MoveError {
    /// Message key of the warning shown for this rejection.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            MoveError::EmptyMove => "empty_move",
            MoveError::UnknownSpell(_) => "spell_not_exists",
            MoveError::UnknownPlayer(_) => "player_not_exists",
            MoveError::IneligibleCaster(_) => "wrong_caster",
            MoveError::MissingTarget(_) => "target_must_exist",
            MoveError::IllegalTarget { .. } => "bad_target",
        }
    }

    /// True for rejections caused by a name that did not resolve.
    #[must_use]
    pub fn is_unknown_entity(&self) -> bool {
        matches!(
            self,
            MoveError::UnknownSpell(_) | MoveError::UnknownPlayer(_) | MoveError::MissingTarget(_)
        )
    }
}

/// Fatal engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("effect kind {0} is not registered")]
    UnknownEffect(EffectKindId),

    #[error("spell {0} is not in the catalog")]
    UnknownSpell(SpellId),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Move(#[from] MoveError),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Snapshot(err.to_string())
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Snapshot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
