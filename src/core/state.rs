//! Match state: the teams, the random source, the round counter.
//!
//! `MatchState` is exclusively owned by the turn engine while a match
//! runs. Players are addressed by `PlayerId`; names are resolved once,
//! when a move is validated.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::player::{Player, PlayerId};
use super::rng::{GameRng, RngCheckpoint};
use super::team::{Team, TeamId};
use crate::effects::EffectRegistry;
use crate::error::{EngineError, Result};
use crate::spells::Side;

/// Complete match state.
///
/// ## Example
///
/// ```
/// use astral_engine::core::{MatchState, Player, Team};
///
/// let owls = Team::new("Owls").with_member(Player::new("ann", 30)).unwrap();
/// let cats = Team::new("Cats").with_member(Player::new("bob", 30)).unwrap();
/// let state = MatchState::new(vec![owls, cats], 7).unwrap();
///
/// let bob = state.locate("bob").unwrap();
/// assert_eq!(state.player(bob).unwrap().name(), "bob");
/// assert_eq!(state.round(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct MatchState {
    teams: Vec<Team>,
    names: FxHashMap<String, PlayerId>,
    rng: GameRng,
    round: u32,
}

impl MatchState {
    /// Assemble a match from pre-built teams.
    ///
    /// Needs at least two non-empty teams with distinct titles and
    /// player names unique across the whole match.
    pub fn new(teams: Vec<Team>, seed: u64) -> Result<Self> {
        if teams.len() < 2 {
            return Err(EngineError::Configuration(format!(
                "a match needs at least two teams, got {}",
                teams.len()
            )));
        }
        if teams.len() > usize::from(u8::MAX) + 1 {
            return Err(EngineError::Configuration(format!("too many teams: {}", teams.len())));
        }

        let mut titles = FxHashMap::default();
        let mut names = FxHashMap::default();
        for (idx, team) in teams.iter().enumerate() {
            if team.is_empty() {
                return Err(EngineError::Configuration(format!(
                    "team {} has no players",
                    team.title()
                )));
            }
            if titles.insert(team.title().to_string(), idx).is_some() {
                return Err(EngineError::Configuration(format!(
                    "duplicate team title {}",
                    team.title()
                )));
            }
            // idx fits: checked above
            let team_id = TeamId::new(idx as u8);
            for player in team.members() {
                let slot = team.slot_of(player.name()).ok_or_else(|| {
                    EngineError::Invariant(format!("player {} has no slot", player.name()))
                })?;
                if names
                    .insert(player.name().to_string(), PlayerId::new(team_id, slot))
                    .is_some()
                {
                    return Err(EngineError::Configuration(format!(
                        "duplicate player name {}",
                        player.name()
                    )));
                }
            }
        }

        Ok(Self {
            teams,
            names,
            rng: GameRng::new(seed),
            round: 0,
        })
    }

    // === Rounds ===

    /// Current round, 1-based once the first round starts.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn begin_round(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    // === Teams ===

    pub fn teams(&self) -> impl Iterator<Item = (TeamId, &Team)> {
        self.teams
            .iter()
            .enumerate()
            .map(|(idx, team)| (TeamId::new(idx as u8), team))
    }

    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    // === Players ===

    /// Find a player by name.
    #[must_use]
    pub fn locate(&self, name: &str) -> Option<PlayerId> {
        self.names.get(name).copied()
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.teams
            .get(id.team.index())
            .and_then(|team| team.member(id.slot))
            .ok_or_else(|| EngineError::Invariant(format!("no player at {}", id)))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.teams
            .get_mut(id.team.index())
            .and_then(|team| team.member_mut(id.slot))
            .ok_or_else(|| EngineError::Invariant(format!("no player at {}", id)))
    }

    /// A player together with the match RNG.
    pub fn split_mut(&mut self, id: PlayerId) -> Result<(&mut Player, &mut GameRng)> {
        let player = self
            .teams
            .get_mut(id.team.index())
            .and_then(|team| team.member_mut(id.slot))
            .ok_or_else(|| EngineError::Invariant(format!("no player at {}", id)))?;
        Ok((player, &mut self.rng))
    }

    /// Name of a player, for notices.
    pub fn name_of(&self, id: PlayerId) -> Result<String> {
        Ok(self.player(id)?.name().to_string())
    }

    /// Every player ID, by team then slot.
    #[must_use]
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.teams()
            .flat_map(|(team_id, team)| {
                (0..team.len()).map(move |slot| PlayerId::new(team_id, slot as u16))
            })
            .collect()
    }

    /// Players able to cast this round, by team then slot.
    pub fn eligible_casters(&self, registry: &EffectRegistry) -> Result<Vec<PlayerId>> {
        let mut eligible = Vec::new();
        for id in self.player_ids() {
            if self.player(id)?.can_act(registry)? {
                eligible.push(id);
            }
        }
        Ok(eligible)
    }

    /// Living players on `side` relative to `caster`.
    ///
    /// `Ally` includes the caster.
    pub fn living_on_side(&self, caster: PlayerId, side: Side) -> Result<Vec<PlayerId>> {
        let mut group = Vec::new();
        for id in self.player_ids() {
            if side.admits(id.team == caster.team) && self.player(id)?.is_alive() {
                group.push(id);
            }
        }
        Ok(group)
    }

    // === RNG ===

    /// The match RNG; checkpoint it to replay from this point.
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// Replace the match RNG with one resumed from `checkpoint`.
    ///
    /// Together with player snapshots this restores a match saved
    /// between rounds.
    pub fn resume_rng(&mut self, checkpoint: &RngCheckpoint) {
        debug!(seed = checkpoint.seed, "resuming match rng");
        self.rng = GameRng::resume(checkpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::standard::NIGHTMARE;
    use crate::effects::ActiveEffect;

    fn team(title: &str, names: &[&str]) -> Team {
        let mut team = Team::new(title);
        for name in names {
            team.add(Player::new(*name, 30)).unwrap();
        }
        team
    }

    fn state() -> MatchState {
        MatchState::new(vec![team("Owls", &["ann", "amy"]), team("Cats", &["bob"])], 1).unwrap()
    }

    #[test]
    fn test_roster_validation() {
        assert!(MatchState::new(vec![team("Owls", &["ann"])], 0).is_err());
        assert!(MatchState::new(vec![team("Owls", &["ann"]), team("Cats", &[])], 0).is_err());
        assert!(MatchState::new(vec![team("Owls", &["ann"]), team("Owls", &["bob"])], 0).is_err());

        let result = MatchState::new(vec![team("Owls", &["ann"]), team("Cats", &["ann"])], 0);
        assert!(matches!(result, Err(EngineError::Configuration(msg)) if msg.contains("ann")));
    }

    #[test]
    fn test_resume_rng() {
        let mut state = state();
        let saved = state.rng().checkpoint();
        let (_, rng) = state.split_mut(PlayerId::new(TeamId::new(0), 0)).unwrap();
        let first: Vec<usize> = (0..8).map(|_| rng.below(100)).collect();

        let teams = vec![team("Owls", &["ann"]), team("Cats", &["bob"])];
        let mut other = MatchState::new(teams, 99).unwrap();
        other.resume_rng(&saved);
        assert_eq!(other.rng().checkpoint(), saved);
        let (_, rng) = other.split_mut(PlayerId::new(TeamId::new(1), 0)).unwrap();
        assert_eq!((0..8).map(|_| rng.below(100)).collect::<Vec<_>>(), first);
    }

    #[test]
    fn test_locate() {
        let state = state();
        let amy = state.locate("amy").unwrap();
        assert_eq!(amy, PlayerId::new(TeamId::new(0), 1));
        assert_eq!(state.name_of(amy).unwrap(), "amy");
        assert!(state.locate("zed").is_none());
    }

    #[test]
    fn test_unknown_id_is_invariant() {
        let state = state();
        let ghost = PlayerId::new(TeamId::new(5), 0);
        assert!(matches!(state.player(ghost), Err(EngineError::Invariant(_))));
    }

    #[test]
    fn test_eligible_casters() {
        let registry = EffectRegistry::standard();
        let mut state = state();
        let ann = state.locate("ann").unwrap();
        let amy = state.locate("amy").unwrap();
        let bob = state.locate("bob").unwrap();

        state.player_mut(ann).unwrap().kill();
        state
            .player_mut(bob)
            .unwrap()
            .add_effect(registry, ActiveEffect::for_rounds(NIGHTMARE, 1))
            .unwrap();

        assert_eq!(state.eligible_casters(registry).unwrap(), vec![amy]);
    }

    #[test]
    fn test_sides() {
        let mut state = state();
        let ann = state.locate("ann").unwrap();
        let amy = state.locate("amy").unwrap();
        let bob = state.locate("bob").unwrap();

        assert_eq!(state.living_on_side(ann, Side::Ally).unwrap(), vec![ann, amy]);
        assert_eq!(state.living_on_side(ann, Side::Enemy).unwrap(), vec![bob]);

        state.player_mut(amy).unwrap().kill();
        assert_eq!(state.living_on_side(bob, Side::All).unwrap(), vec![ann, bob]);
    }

    #[test]
    fn test_rounds_count_up() {
        let mut state = state();
        assert_eq!(state.begin_round(), 1);
        assert_eq!(state.begin_round(), 2);
        assert_eq!(state.round(), 2);
    }
}
