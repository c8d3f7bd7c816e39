//! The turn engine: the round loop of a match.
//!
//! Each round runs, in order:
//! 1. pre-round effect pulses
//! 2. eligible casters: alive and not incapacitated
//! 3. move collection (see `MoveCollector`)
//! 4. stable sort by spell priority, highest first
//! 5. resolution; a caster who died earlier in the round fizzles, a
//!    living one gets its on-action pulses and then its spell
//! 6. post-round pulses and the duration tick
//! 7. a round summary
//!
//! The winner is evaluated once, after the last round. Eliminating a
//! team does not end the match early.

use std::cmp::Reverse;

use tracing::{debug, info, trace};

use super::collect::MoveCollector;
use super::messages::{MessageSink, Notice};
use super::moves::Move;
use super::source::MoveSource;
use crate::core::{MatchConfig, MatchState, PlayerId, RoundDeadline};
use crate::effects::ReactionTiming;
use crate::error::{EngineError, Result};
use crate::rules::{evaluate, standings, MatchResult, Rulebook};
use crate::spells::{SpellId, SpellResolver};

/// What happened to the moves of one round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub eligible: Vec<PlayerId>,
    /// Casts in resolution order.
    pub resolved: Vec<(PlayerId, SpellId)>,
    /// Casters who died before their slot.
    pub fizzled: Vec<PlayerId>,
    pub passed: Vec<PlayerId>,
}

/// Runs a match.
///
/// ## Example
///
/// ```
/// use astral_engine::core::{MatchConfig, TeamSpec};
/// use astral_engine::engine::{BufferedSink, ScriptedMoves, TurnEngine};
/// use astral_engine::rules::{MatchResult, Rulebook};
///
/// let config = MatchConfig::new(1)
///     .with_team(TeamSpec::new("Owls").with_member("ann"))
///     .with_team(TeamSpec::new("Cats").with_member("bob"));
/// let mut engine = TurnEngine::from_config(&config, Rulebook::standard()).unwrap();
///
/// let mut moves = ScriptedMoves::new(["ann 01", "bob 11 ann"]);
/// let mut sink = BufferedSink::new();
/// let result = engine.run(&mut moves, &mut sink).unwrap();
///
/// // Fire Arrow and Burn cost ann 7 hp, Meditation only restores 3 mana
/// assert_eq!(result, MatchResult::Winner("Cats".into()));
/// ```
pub struct TurnEngine {
    rules: Rulebook,
    state: MatchState,
    rounds: u32,
    deadline: RoundDeadline,
}

impl TurnEngine {
    /// Engine over a prepared state.
    pub fn new(rules: Rulebook, state: MatchState, rounds: u32) -> Result<Self> {
        if rounds == 0 {
            return Err(EngineError::Configuration("round count must be positive".into()));
        }
        Ok(Self {
            rules,
            state,
            rounds,
            deadline: RoundDeadline::none(),
        })
    }

    /// Validate `config` and build its match.
    pub fn from_config(config: &MatchConfig, rules: Rulebook) -> Result<Self> {
        let state = config.build_state(&rules.spells)?;
        Ok(Self::new(rules, state, config.rounds)?.with_deadline(config.deadline))
    }

    /// Set the per-round collection deadline (builder pattern).
    #[must_use]
    pub fn with_deadline(mut self, deadline: RoundDeadline) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn rules(&self) -> &Rulebook {
        &self.rules
    }

    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    #[must_use]
    pub fn into_state(self) -> MatchState {
        self.state
    }

    /// Play every remaining round, then evaluate the winner.
    pub fn run(
        &mut self,
        source: &mut dyn MoveSource,
        sink: &mut dyn MessageSink,
    ) -> Result<MatchResult> {
        info!(rounds = self.rounds, teams = self.state.team_count(), "match started");
        while self.state.round() < self.rounds {
            self.play_round(source, sink)?;
        }

        let result = evaluate(&self.state);
        match &result {
            MatchResult::Winner(title) => {
                info!(winner = %title, "match finished");
                sink.emit(&Notice::Winner { title: title.clone() });
            }
            MatchResult::Draw(titles) => {
                info!(?titles, "match finished in a draw");
                sink.emit(&Notice::Draw { titles: titles.clone() });
            }
        }
        Ok(result)
    }

    /// Play one round.
    pub fn play_round(
        &mut self,
        source: &mut dyn MoveSource,
        sink: &mut dyn MessageSink,
    ) -> Result<RoundReport> {
        let round = self.state.begin_round();
        info!(round, "round started");
        sink.emit(&Notice::NewRound { round });

        for id in self.state.player_ids() {
            self.pulse(id, ReactionTiming::PreRound, sink)?;
        }

        let eligible = self.state.eligible_casters(&self.rules.effects)?;
        let moves = MoveCollector::new(&self.rules, self.deadline).collect(
            &self.state,
            &eligible,
            source,
            sink,
        )?;

        let mut report = RoundReport {
            round,
            eligible,
            ..RoundReport::default()
        };

        let mut casts = Vec::new();
        for mv in moves {
            match mv {
                Move::Cast { caster, spell, targets } => {
                    let priority = self.rules.spell(spell)?.priority;
                    casts.push((priority, caster, spell, targets));
                }
                Move::Pass { caster } => report.passed.push(caster),
            }
        }
        // Stable: equal priorities keep arrival order
        casts.sort_by_key(|(priority, ..)| Reverse(*priority));

        for (_, caster, spell_id, targets) in casts {
            if self.state.player(caster)?.is_alive() {
                self.pulse(caster, ReactionTiming::OnAction, sink)?;
            }
            let name = self.state.name_of(caster)?;
            if self.state.player(caster)?.is_dead() {
                debug!(caster = %name, spell = %spell_id, "spell fizzled");
                sink.emit(&Notice::Fizzled { caster: name, spell: spell_id });
                report.fizzled.push(caster);
                continue;
            }

            let spell = self.rules.spell(spell_id)?;
            sink.emit(&Notice::SpellCast {
                caster: name,
                spell: spell_id,
                title: spell.title.clone(),
            });
            let outcomes =
                SpellResolver::resolve(&mut self.state, &self.rules, caster, spell, &targets)?;
            for outcome in outcomes {
                sink.emit(&Notice::Resolved(outcome));
            }
            report.resolved.push((caster, spell_id));
        }

        for id in self.state.player_ids() {
            self.pulse(id, ReactionTiming::PostRound, sink)?;
        }
        for id in self.state.player_ids() {
            let player = self.state.player_mut(id)?;
            for expired in player.tick_effects(&self.rules.effects)? {
                trace!(player = %player.name(), effect = %expired.kind, "effect expired");
                sink.emit(&Notice::EffectExpired {
                    target: player.name().to_string(),
                    effect: expired.kind,
                });
            }
        }

        sink.emit(&Notice::RoundSummary {
            round,
            standings: standings(&self.state),
        });
        debug!(
            round,
            resolved = report.resolved.len(),
            fizzled = report.fizzled.len(),
            passed = report.passed.len(),
            "round finished"
        );
        Ok(report)
    }

    /// Fire the pulses of `id`'s live effects reacting at `timing`.
    fn pulse(
        &mut self,
        id: PlayerId,
        timing: ReactionTiming,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        let player = self.state.player_mut(id)?;
        for (effect, pulse) in player.pulses(&self.rules.effects, timing)? {
            if player.is_dead() {
                break;
            }
            let applied = player.apply_pulse(pulse);
            trace!(player = %player.name(), %effect, ?timing, "effect pulse");
            sink.emit(&Notice::Pulsed {
                target: player.name().to_string(),
                effect,
                applied,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Player, Team, TeamSpec};
    use crate::effects::standard::{BURN, NIGHTMARE};
    use crate::effects::ActiveEffect;
    use crate::engine::{BufferedSink, ScriptedMoves};
    use crate::spells::standard;

    fn engine(rounds: u32) -> TurnEngine {
        let config = MatchConfig::new(rounds)
            .with_team(TeamSpec::new("Owls").with_member("ann").with_member("amy"))
            .with_team(TeamSpec::new("Cats").with_member("bob"));
        TurnEngine::from_config(&config, Rulebook::standard()).unwrap()
    }

    fn id(engine: &TurnEngine, name: &str) -> PlayerId {
        engine.state().locate(name).unwrap()
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let owls = Team::new("Owls").with_member(Player::new("ann", 30)).unwrap();
        let cats = Team::new("Cats").with_member(Player::new("bob", 30)).unwrap();
        let state = MatchState::new(vec![owls, cats], 0).unwrap();
        assert!(TurnEngine::new(Rulebook::standard(), state, 0).is_err());
    }

    #[test]
    fn test_resolution_by_descending_priority() {
        let mut engine = engine(1);
        // Run (18), Fire Arrow (27), Levitation (20)
        let mut source = ScriptedMoves::new(["ann 02", "amy 11 bob", "bob 04"]);
        let report = engine.play_round(&mut source, &mut BufferedSink::new()).unwrap();

        let order: Vec<_> = report.resolved.iter().map(|(_, spell)| *spell).collect();
        assert_eq!(order, vec![standard::FIRE_ARROW, standard::LEVITATION, standard::RUN]);
    }

    #[test]
    fn test_killed_caster_fizzles() {
        let mut engine = engine(1);
        let bob = id(&engine, "bob");
        engine.state.player_mut(bob).unwrap().damage(25);

        // Fire Arrow (27) lands before bob's Meditation (21)
        let mut source = ScriptedMoves::new(["bob 01", "ann 11 bob", "amy 02"]);
        let mut sink = BufferedSink::new();
        let report = engine.play_round(&mut source, &mut sink).unwrap();

        assert_eq!(report.fizzled, vec![bob]);
        assert_eq!(report.resolved.len(), 2);
        assert_eq!(sink.count("fizzle"), 1);
    }

    #[test]
    fn test_incapacitated_player_is_not_asked() {
        let mut engine = engine(1);
        let bob = id(&engine, "bob");
        engine
            .state
            .player_mut(bob)
            .unwrap()
            .add_effect(&Rulebook::standard().effects, ActiveEffect::for_rounds(NIGHTMARE, 1))
            .unwrap();

        let mut source = ScriptedMoves::new(["bob 01", "ann 01", "amy 01"]);
        let mut sink = BufferedSink::new();
        let report = engine.play_round(&mut source, &mut sink).unwrap();

        assert!(!report.eligible.contains(&bob));
        assert_eq!(sink.count("wrong_caster"), 1);
        // Pre-round nightmare pulse burns 2 mana
        assert_eq!(engine.state().player(bob).unwrap().mana(), 28);
    }

    #[test]
    fn test_post_round_pulse_then_tick() {
        let mut engine = engine(1);
        let bob = id(&engine, "bob");
        engine
            .state
            .player_mut(bob)
            .unwrap()
            .add_effect(&Rulebook::standard().effects, ActiveEffect::persistent(BURN))
            .unwrap();

        let mut source = ScriptedMoves::new(["ann 01", "amy 01", "bob 01"]);
        let mut sink = BufferedSink::new();
        engine.play_round(&mut source, &mut sink).unwrap();

        assert_eq!(engine.state().player(bob).unwrap().hp(), 29);
        assert_eq!(sink.count("effect_pulse"), 1);
        assert_eq!(sink.keys().last(), Some(&"round_summary"));
    }

    #[test]
    fn test_run_plays_every_round() {
        let mut engine = engine(3);
        let mut source = ScriptedMoves::new(Vec::<String>::new());
        let mut sink = BufferedSink::new();

        let result = engine.run(&mut source, &mut sink).unwrap();

        assert_eq!(engine.state().round(), 3);
        assert_eq!(sink.count("new_round"), 3);
        assert_eq!(sink.count("source_exhausted"), 9);
        assert_eq!(result, MatchResult::Winner("Owls".into()));
        assert_eq!(sink.keys().last(), Some(&"winner"));
    }
}
