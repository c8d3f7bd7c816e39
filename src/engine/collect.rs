//! Move collection and validation.
//!
//! `MoveCollector` asks the move source for moves until every eligible
//! caster has one. Each submission is validated on arrival; a rejected
//! submission produces exactly one warning and the source is asked
//! again. A caster may resubmit before the round closes, and the later
//! move replaces the earlier one.
//!
//! With a `RoundDeadline`, the budget is checked before every request and
//! the time left is handed to the source. Once it is spent, every caster
//! still owed a move passes, and a submission that arrives late is dropped.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::messages::{MessageSink, Notice, PassReason};
use super::moves::{Move, RawMove};
use super::source::MoveSource;
use crate::core::{MatchState, PlayerId, RoundDeadline};
use crate::error::{MoveError, Result};
use crate::rules::Rulebook;
use crate::spells::TargetType;

/// Collects one valid move per eligible caster.
pub struct MoveCollector<'a> {
    rules: &'a Rulebook,
    deadline: RoundDeadline,
}

impl<'a> MoveCollector<'a> {
    #[must_use]
    pub fn new(rules: &'a Rulebook, deadline: RoundDeadline) -> Self {
        Self { rules, deadline }
    }

    /// Collect moves for `eligible`.
    ///
    /// Returns the accepted moves in arrival order; a replaced move takes
    /// the position of its replacement.
    pub fn collect(
        &self,
        state: &MatchState,
        eligible: &[PlayerId],
        source: &mut dyn MoveSource,
        sink: &mut dyn MessageSink,
    ) -> Result<Vec<Move>> {
        let started = Instant::now();
        let mut submissions: u32 = 0;
        let mut accepted: Vec<Move> = Vec::new();

        loop {
            let pending: Vec<PlayerId> = eligible
                .iter()
                .copied()
                .filter(|id| accepted.iter().all(|m| m.caster() != *id))
                .collect();
            if pending.is_empty() {
                break;
            }

            let budget = self.remaining(started);
            let out_of_budget = budget == Some(Duration::ZERO)
                || self
                    .deadline
                    .max_submissions
                    .is_some_and(|limit| submissions >= limit);
            if out_of_budget || source.is_exhausted() {
                let reason = if out_of_budget {
                    PassReason::Deadline
                } else {
                    PassReason::SourceExhausted
                };
                for caster in pending {
                    let name = state.name_of(caster)?;
                    warn!(caster = %name, ?reason, "no move before the round closed, passing");
                    sink.emit(&Notice::Passed { caster: name, reason });
                    accepted.push(Move::Pass { caster });
                }
                break;
            }

            let names = pending
                .iter()
                .map(|id| state.name_of(*id))
                .collect::<Result<Vec<_>>>()?;
            let submission = source.get_move(&names, budget);
            submissions += 1;
            if self.remaining(started) == Some(Duration::ZERO) {
                debug!(?submission, "submission arrived after the round closed, dropped");
                continue;
            }

            let validated = match submission {
                Some(raw) => self.validate(state, eligible, &raw),
                None => Err(MoveError::EmptyMove),
            };
            match validated {
                Ok(mv) => {
                    let name = state.name_of(mv.caster())?;
                    if let Some(pos) = accepted.iter().position(|m| m.caster() == mv.caster()) {
                        accepted.remove(pos);
                        debug!(caster = %name, "move updated");
                        sink.emit(&Notice::MoveUpdated { caster: name });
                    } else {
                        debug!(caster = %name, "move saved");
                        sink.emit(&Notice::MoveSaved { caster: name });
                    }
                    accepted.push(mv);
                }
                Err(error) => {
                    warn!(key = error.key(), "move rejected: {}", error);
                    sink.emit(&Notice::MoveRejected { error });
                }
            }
        }

        Ok(accepted)
    }

    /// Wall-clock time left in the round, `None` without a limit.
    fn remaining(&self, started: Instant) -> Option<Duration> {
        self.deadline
            .wall_clock
            .map(|limit| limit.saturating_sub(started.elapsed()))
    }

    /// Validate one raw move against the current state.
    ///
    /// Checks, in order: the spell token resolves, the caster is eligible,
    /// and the targets satisfy the spell's target type.
    pub fn validate(
        &self,
        state: &MatchState,
        eligible: &[PlayerId],
        raw: &RawMove,
    ) -> std::result::Result<Move, MoveError> {
        let spell_id = self.rules.resolve_spell(&raw.spell)?;
        let spell = self
            .rules
            .spell(spell_id)
            .map_err(|_| MoveError::UnknownSpell(raw.spell.trim().to_string()))?;

        let caster = state
            .locate(&raw.caster)
            .ok_or_else(|| MoveError::UnknownPlayer(raw.caster.clone()))?;
        if !eligible.contains(&caster) {
            return Err(MoveError::IneligibleCaster(raw.caster.clone()));
        }

        let target_type = spell.target_type;
        let targets = if target_type.is_implicit() {
            Vec::new()
        } else if target_type.requires_explicit_target() && raw.target.is_implicit() {
            return Err(MoveError::MissingTarget(spell_id));
        } else {
            let mut targets = Vec::new();
            for name in raw.target.names() {
                let target = state
                    .locate(name)
                    .ok_or_else(|| MoveError::UnknownPlayer(name.to_string()))?;
                let illegal = |reason: &'static str| MoveError::IllegalTarget {
                    target: name.to_string(),
                    spell: spell_id,
                    reason,
                };
                target_type
                    .check(target == caster, target.team == caster.team)
                    .map_err(illegal)?;
                let alive = state.player(target).map(|p| p.is_alive()).unwrap_or(false);
                if spell.is_beneficial() && !alive {
                    return Err(illegal("dead players cannot receive beneficial spells"));
                }
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
            // Caster-only spells land on the caster whatever was named
            if target_type == TargetType::Caster {
                Vec::new()
            } else {
                targets
            }
        };

        Ok(Move::Cast {
            caster,
            spell: spell_id,
            targets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Player, Team};
    use crate::engine::{BufferedSink, ScriptedMoves};
    use crate::spells::standard;

    fn state() -> MatchState {
        let owls = Team::new("Owls")
            .with_member(Player::new("ann", 30))
            .unwrap()
            .with_member(Player::new("amy", 30))
            .unwrap();
        let cats = Team::new("Cats").with_member(Player::new("bob", 30)).unwrap();
        MatchState::new(vec![owls, cats], 0).unwrap()
    }

    fn validate(state: &MatchState, line: &str) -> std::result::Result<Move, MoveError> {
        let rules = Rulebook::standard();
        let eligible = state.eligible_casters(&rules.effects).unwrap();
        MoveCollector::new(&rules, RoundDeadline::none()).validate(
            state,
            &eligible,
            &RawMove::parse(line).unwrap(),
        )
    }

    #[test]
    fn test_unknown_spell_and_player() {
        let state = state();
        assert_eq!(validate(&state, "ann 99"), Err(MoveError::UnknownSpell("99".into())));
        assert_eq!(validate(&state, "zed 01"), Err(MoveError::UnknownPlayer("zed".into())));
        assert_eq!(validate(&state, "ann 11 zed"), Err(MoveError::UnknownPlayer("zed".into())));
    }

    #[test]
    fn test_target_type_rules() {
        let state = state();
        assert!(matches!(validate(&state, "ann 01 bob"), Err(MoveError::IllegalTarget { .. })));
        assert!(matches!(validate(&state, "ann heal bob"), Err(MoveError::IllegalTarget { .. })));
        assert!(matches!(validate(&state, "ann 11 amy"), Err(MoveError::IllegalTarget { .. })));
        assert_eq!(validate(&state, "ann 11"), Err(MoveError::MissingTarget(standard::FIRE_ARROW)));

        let bob = state.locate("bob").unwrap();
        let ann = state.locate("ann").unwrap();
        assert_eq!(
            validate(&state, "ann 11 bob").unwrap(),
            Move::Cast { caster: ann, spell: standard::FIRE_ARROW, targets: vec![bob] }
        );
        // Self-cast naming oneself is fine
        assert_eq!(
            validate(&state, "ann 01 ann").unwrap(),
            Move::Cast { caster: ann, spell: standard::MEDITATION, targets: vec![] }
        );
    }

    #[test]
    fn test_massive_ignores_named_targets() {
        let state = state();
        let ann = state.locate("ann").unwrap();
        assert_eq!(
            validate(&state, "ann 21 amy").unwrap(),
            Move::Cast { caster: ann, spell: standard::BLIZZARD, targets: vec![] }
        );
    }

    #[test]
    fn test_dead_players() {
        let mut state = state();
        let amy = state.locate("amy").unwrap();
        state.player_mut(amy).unwrap().kill();

        assert_eq!(validate(&state, "amy 01"), Err(MoveError::IneligibleCaster("amy".into())));
        assert!(matches!(validate(&state, "ann heal amy"), Err(MoveError::IllegalTarget { .. })));
        // Dispelling is not beneficial, so the dead stay targetable
        assert!(validate(&state, "ann 119 amy").is_ok());
    }

    #[test]
    fn test_duplicate_targets_collapse() {
        let state = state();
        let amy = state.locate("amy").unwrap();
        match validate(&state, "ann heal amy,amy").unwrap() {
            Move::Cast { targets, .. } => assert_eq!(targets, vec![amy]),
            Move::Pass { .. } => panic!("expected a cast"),
        }
    }

    #[test]
    fn test_collect_reprompts_and_overwrites() {
        let rules = Rulebook::standard();
        let state = state();
        let eligible = state.eligible_casters(&rules.effects).unwrap();
        let mut source = ScriptedMoves::new([
            "ann 01",
            "garbage",
            "ann 99",
            "amy 02",
            "ann 03",
            "bob 11 ann",
        ]);
        let mut sink = BufferedSink::new();

        let moves = MoveCollector::new(&rules, RoundDeadline::none())
            .collect(&state, &eligible, &mut source, &mut sink)
            .unwrap();

        // ann's replacement arrives after amy's move
        let casters: Vec<_> = moves.iter().map(|m| state.name_of(m.caster()).unwrap()).collect();
        assert_eq!(casters, vec!["amy", "ann", "bob"]);
        assert_eq!(
            sink.keys(),
            vec![
                "move_saved",
                "empty_move",
                "spell_not_exists",
                "move_saved",
                "move_updated",
                "move_saved",
            ]
        );
    }

    #[test]
    fn test_submission_budget_passes_pending() {
        let rules = Rulebook::standard();
        let state = state();
        let eligible = state.eligible_casters(&rules.effects).unwrap();
        let mut source = ScriptedMoves::new(["ann 01", "zed 01", "zed 01", "amy 01"]);
        let mut sink = BufferedSink::new();

        let moves = MoveCollector::new(&rules, RoundDeadline::none().with_max_submissions(3))
            .collect(&state, &eligible, &mut source, &mut sink)
            .unwrap();

        assert_eq!(moves.len(), 3);
        assert_eq!(moves.iter().filter(|m| m.is_pass()).count(), 2);
        assert_eq!(sink.count("deadline_pass"), 2);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_zero_wall_clock_passes_everyone() {
        let rules = Rulebook::standard();
        let state = state();
        let eligible = state.eligible_casters(&rules.effects).unwrap();
        let mut source = ScriptedMoves::new(["ann 01"]);
        let mut sink = BufferedSink::new();

        let deadline = RoundDeadline::none().with_wall_clock(std::time::Duration::ZERO);
        let moves = MoveCollector::new(&rules, deadline)
            .collect(&state, &eligible, &mut source, &mut sink)
            .unwrap();

        assert!(moves.iter().all(Move::is_pass));
        assert_eq!(source.remaining(), 1);
    }

    /// Answers only after the round budget has run out.
    struct StalledSource {
        budgets: Vec<Option<Duration>>,
    }

    impl MoveSource for StalledSource {
        fn get_move(&mut self, _pending: &[String], budget: Option<Duration>) -> Option<RawMove> {
            self.budgets.push(budget);
            let stall = Duration::from_millis(1500);
            std::thread::sleep(budget.map_or(stall, |b| b.min(stall)));
            RawMove::parse("ann 01")
        }
    }

    #[test]
    fn test_wall_clock_bounds_a_stalled_source() {
        let rules = Rulebook::standard();
        let state = state();
        let eligible = state.eligible_casters(&rules.effects).unwrap();
        let mut source = StalledSource { budgets: Vec::new() };
        let mut sink = BufferedSink::new();

        let limit = Duration::from_millis(50);
        let started = Instant::now();
        let moves = MoveCollector::new(&rules, RoundDeadline::none().with_wall_clock(limit))
            .collect(&state, &eligible, &mut source, &mut sink)
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(source.budgets.len(), 1);
        assert!(source.budgets[0].is_some_and(|b| b <= limit));
        // The late answer is dropped, not saved or warned about
        assert!(moves.iter().all(Move::is_pass));
        assert_eq!(sink.count("deadline_pass"), 3);
        assert_eq!(sink.count("move_saved"), 0);
        assert_eq!(sink.count("empty_move"), 0);
    }

    #[test]
    fn test_exhausted_source_passes() {
        let rules = Rulebook::standard();
        let state = state();
        let eligible = state.eligible_casters(&rules.effects).unwrap();
        let mut source = ScriptedMoves::new(["bob 01"]);
        let mut sink = BufferedSink::new();

        let moves = MoveCollector::new(&rules, RoundDeadline::none())
            .collect(&state, &eligible, &mut source, &mut sink)
            .unwrap();

        assert_eq!(moves.iter().filter(|m| !m.is_pass()).count(), 1);
        assert_eq!(sink.count("source_exhausted"), 2);
    }
}
