//! Spell targeting constraints.
//!
//! Every spell declares one `TargetType`:
//! - `Caster`: affects only the caster
//! - `Directed { side }`: one or more named players on `side`
//! - `Massive { side }`: everyone alive on `side`, no names needed

use serde::{Deserialize, Serialize};

/// Which side of the caster a target must be on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The caster's own team (caster included).
    Ally,
    /// Any team other than the caster's.
    Enemy,
    /// Anyone.
    All,
}

impl Side {
    /// Check whether a player on the same team (or not) is on this side.
    #[must_use]
    pub fn admits(self, same_team: bool) -> bool {
        match self {
            Side::Ally => same_team,
            Side::Enemy => !same_team,
            Side::All => true,
        }
    }
}

/// Target constraint of a spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    Caster,
    Directed { side: Side },
    Massive { side: Side },
}

impl TargetType {
    /// Does a move casting this spell have to name its target(s)?
    #[must_use]
    pub fn requires_explicit_target(self) -> bool {
        matches!(self, TargetType::Directed { .. })
    }

    /// Is the target group implied by the spell rather than named?
    #[must_use]
    pub fn is_implicit(self) -> bool {
        matches!(self, TargetType::Massive { .. })
    }

    /// Check a named target against this constraint.
    ///
    /// Returns the rejection reason on failure. Massive spells ignore
    /// named targets and always pass.
    pub fn check(self, is_caster: bool, same_team: bool) -> Result<(), &'static str> {
        match self {
            TargetType::Caster if !is_caster => Err("spell can only target its caster"),
            TargetType::Directed { side: Side::Ally } if !same_team => {
                Err("spell can only target allies")
            }
            TargetType::Directed { side: Side::Enemy } if same_team => {
                Err("spell can only target enemies")
            }
            _ => Ok(()),
        }
    }
}
