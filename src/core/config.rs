//! Match configuration types.
//!
//! Hosts configure a match by providing:
//! - `PlayerStats`: starting stats shared by every player
//! - `TeamSpec`: a team title and its player names
//! - `RoundDeadline`: optional per-round collection budget
//! - `MatchConfig`: combines all configuration
//!
//! Every type derives `serde`, so a host can load a match from JSON.

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::state::MatchState;
use super::team::Team;
use crate::error::{EngineError, Result};
use crate::spells::{standard, SpellCatalog, SpellId};

/// Starting stats for every player of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    /// Starting mana equals max hp.
    pub max_hp: u32,
    pub armor: u32,
    /// One copy of each.
    pub starting_spells: Vec<SpellId>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_hp: 30,
            armor: 0,
            starting_spells: standard::starting_spells(),
        }
    }
}

impl PlayerStats {
    #[must_use]
    pub fn new(max_hp: u32) -> Self {
        Self {
            max_hp,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_armor(mut self, armor: u32) -> Self {
        self.armor = armor;
        self
    }

    #[must_use]
    pub fn with_spells(mut self, spells: Vec<SpellId>) -> Self {
        self.starting_spells = spells;
        self
    }

    /// A player named `name` with these stats.
    #[must_use]
    pub fn build(&self, name: impl Into<String>) -> Player {
        Player::new(name, self.max_hp)
            .with_armor(self.armor)
            .with_spells(self.starting_spells.iter().copied())
    }
}

/// Budget for collecting one round's moves.
///
/// Once either budget is spent, pending casters pass. With neither
/// set, collection waits for every caster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundDeadline {
    pub wall_clock: Option<Duration>,
    /// Submissions accepted or rejected, counted together.
    pub max_submissions: Option<u32>,
}

impl RoundDeadline {
    /// No deadline.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_wall_clock(mut self, limit: Duration) -> Self {
        self.wall_clock = Some(limit);
        self
    }

    #[must_use]
    pub fn with_max_submissions(mut self, limit: u32) -> Self {
        self.max_submissions = Some(limit);
        self
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.wall_clock.is_none() && self.max_submissions.is_none()
    }
}

/// A team title and its player names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSpec {
    pub title: String,
    pub members: Vec<String>,
}

impl TeamSpec {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.members.push(name.into());
        self
    }
}

/// Complete match configuration.
///
/// ## Example
///
/// ```
/// use astral_engine::core::{MatchConfig, TeamSpec};
/// use astral_engine::spells::SpellCatalog;
///
/// let config = MatchConfig::new(5)
///     .with_seed(9)
///     .with_team(TeamSpec::new("Owls").with_member("ann"))
///     .with_team(TeamSpec::new("Cats").with_member("bob"));
///
/// let state = config.build_state(SpellCatalog::standard()).unwrap();
/// assert_eq!(state.team_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of rounds played; the winner is decided after the last.
    pub rounds: u32,
    pub seed: u64,
    pub player: PlayerStats,
    pub deadline: RoundDeadline,
    pub teams: Vec<TeamSpec>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: 30,
            seed: 0,
            player: PlayerStats::default(),
            deadline: RoundDeadline::default(),
            teams: Vec::new(),
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_player_stats(mut self, stats: PlayerStats) -> Self {
        self.player = stats;
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: RoundDeadline) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: TeamSpec) -> Self {
        self.teams.push(team);
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the configuration can produce a match.
    pub fn validate(&self, catalog: &SpellCatalog) -> Result<()> {
        if self.rounds == 0 {
            return Err(EngineError::Configuration("round count must be positive".into()));
        }
        if self.player.max_hp == 0 {
            return Err(EngineError::Configuration("max hp must be positive".into()));
        }
        if self.teams.len() < 2 {
            return Err(EngineError::Configuration(format!(
                "a match needs at least two teams, got {}",
                self.teams.len()
            )));
        }
        if let Some(id) = self.player.starting_spells.iter().find(|id| !catalog.contains(**id)) {
            return Err(EngineError::Configuration(format!(
                "starting spell {} is not in the catalog",
                id
            )));
        }

        let mut titles = FxHashSet::default();
        let mut names = FxHashSet::default();
        for team in &self.teams {
            if team.members.is_empty() {
                return Err(EngineError::Configuration(format!(
                    "team {} has no players",
                    team.title
                )));
            }
            if !titles.insert(team.title.as_str()) {
                return Err(EngineError::Configuration(format!(
                    "duplicate team title {}",
                    team.title
                )));
            }
            for name in &team.members {
                if name.trim().is_empty() {
                    return Err(EngineError::Configuration(format!(
                        "team {} has a blank player name",
                        team.title
                    )));
                }
                if !names.insert(name.as_str()) {
                    return Err(EngineError::Configuration(format!(
                        "duplicate player name {}",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validate and build the initial match state.
    pub fn build_state(&self, catalog: &SpellCatalog) -> Result<MatchState> {
        self.validate(catalog)?;
        let mut teams = Vec::with_capacity(self.teams.len());
        for entry in &self.teams {
            let mut team = Team::new(entry.title.clone());
            for name in &entry.members {
                team.add(self.player.build(name.clone()))?;
            }
            teams.push(team);
        }
        MatchState::new(teams, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchConfig {
        MatchConfig::new(3)
            .with_team(TeamSpec::new("Owls").with_member("ann").with_member("amy"))
            .with_team(TeamSpec::new("Cats").with_member("bob"))
    }

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.rounds, 30);
        assert_eq!(config.player.max_hp, 30);
        assert_eq!(config.player.armor, 0);
        assert!(config.deadline.is_unbounded());
    }

    #[test]
    fn test_player_stats_build() {
        let stats = PlayerStats::new(20).with_armor(2).with_spells(vec![standard::RUN]);
        let player = stats.build("ann");

        assert_eq!(player.hp(), 20);
        assert_eq!(player.mana(), 20);
        assert_eq!(player.armor(), 2);
        assert_eq!(player.spells(), vec![(standard::RUN, 1)]);
    }

    #[test]
    fn test_validate_rejects_bad_rosters() {
        let catalog = SpellCatalog::standard();
        assert!(config().validate(catalog).is_ok());

        let zero_rounds = MatchConfig { rounds: 0, ..config() };
        assert!(zero_rounds.validate(catalog).is_err());

        let one_team = MatchConfig::new(3).with_team(TeamSpec::new("Owls").with_member("ann"));
        assert!(one_team.validate(catalog).is_err());

        let empty_team = config().with_team(TeamSpec::new("Bats"));
        assert!(empty_team.validate(catalog).is_err());

        let dup_title = config().with_team(TeamSpec::new("Owls").with_member("zed"));
        assert!(dup_title.validate(catalog).is_err());

        let dup_name = config().with_team(TeamSpec::new("Bats").with_member("ann"));
        assert!(matches!(
            dup_name.validate(catalog),
            Err(EngineError::Configuration(msg)) if msg.contains("ann")
        ));

        let stats = PlayerStats::default().with_spells(vec![SpellId::new(9, 99)]);
        let bad_spell = config().with_player_stats(stats);
        assert!(bad_spell.validate(catalog).is_err());
    }

    #[test]
    fn test_build_state() {
        let state = config().build_state(SpellCatalog::standard()).unwrap();
        let amy = state.locate("amy").unwrap();
        assert_eq!(state.player(amy).unwrap().hp(), 30);
        assert_eq!(
            state.player(amy).unwrap().spell_total() as usize,
            standard::starting_spells().len()
        );
    }

    #[test]
    fn test_json_config() {
        let json = r#"{
            "rounds": 2,
            "seed": 11,
            "deadline": { "max_submissions": 8 },
            "teams": [
                { "title": "Owls", "members": ["ann"] },
                { "title": "Cats", "members": ["bob"] }
            ]
        }"#;
        let config = MatchConfig::from_json(json).unwrap();

        assert_eq!(config.rounds, 2);
        assert_eq!(config.deadline.max_submissions, Some(8));
        assert_eq!(config.player, PlayerStats::default());
        assert!(config.validate(SpellCatalog::standard()).is_ok());
    }
}
