//! Core match types: players, teams, state, RNG, configuration.
//!
//! Everything here is mutated only by the turn engine while a round
//! resolves; hosts read it between rounds.

pub mod config;
pub mod player;
pub mod rng;
pub mod state;
pub mod team;

pub use config::{MatchConfig, PlayerStats, RoundDeadline, TeamSpec};
pub use player::{Player, PlayerId, PlayerSnapshot, MANA_HEADROOM};
pub use rng::{GameRng, RngCheckpoint};
pub use state::MatchState;
pub use team::{Team, TeamId};
