//! Round loop tests.
//!
//! These tests drive whole rounds through `TurnEngine`:
//! - Priority ordering and arrival-order tie breaks
//! - Fizzles, passes and the accepted-caster set
//! - Multi-round scenarios and end-of-match evaluation

use astral_engine::core::{MatchConfig, MatchState, Player, PlayerId, RoundDeadline, Team, TeamSpec};
use astral_engine::effects::standard::MANA_RESIST;
use astral_engine::effects::{ActiveEffect, EffectDuration, EffectRegistry};
use astral_engine::engine::{BufferedSink, Notice, ScriptedMoves, TurnEngine};
use astral_engine::rules::{MatchResult, Rulebook};
use astral_engine::spells::{
    AliasTable, Side, Spell, SpellBehavior, SpellCatalog, SpellEffect, SpellId, TargetType,
};

const SLOW_A: SpellId = SpellId::new(0, 1);
const FAST: SpellId = SpellId::new(0, 2);
const SLOW_C: SpellId = SpellId::new(0, 3);
const RESTORE: SpellId = SpellId::new(0, 4);
const STRIKE: SpellId = SpellId::new(1, 1);

/// Small rulebook with round numbers that are easy to check by hand.
fn drill_rules() -> Rulebook {
    let armor = || SpellBehavior::Generic(SpellEffect::new().add_armor(1));
    let mut spells = SpellCatalog::new();
    let book = [
        Spell::new(SLOW_A, "Slow A", 5, TargetType::Caster, armor()),
        Spell::new(FAST, "Fast", 20, TargetType::Caster, armor()),
        Spell::new(SLOW_C, "Slow C", 5, TargetType::Caster, armor()),
        Spell::new(
            RESTORE,
            "Restore",
            10,
            TargetType::Caster,
            SpellBehavior::Generic(SpellEffect::new().restore_mana(4)),
        ),
        Spell::new(
            STRIKE,
            "Strike",
            10,
            TargetType::Directed { side: Side::Enemy },
            SpellBehavior::Generic(SpellEffect::new().damage(5)),
        ),
    ];
    for spell in book {
        spells.register(spell).unwrap();
    }
    Rulebook::new(EffectRegistry::standard().clone(), spells, AliasTable::new()).unwrap()
}

fn roster(teams: &[(&str, &[&str])]) -> Vec<Team> {
    teams
        .iter()
        .map(|(title, names)| {
            let mut team = Team::new(*title);
            for name in *names {
                team.add(Player::new(*name, 30)).unwrap();
            }
            team
        })
        .collect()
}

fn id(engine: &TurnEngine, name: &str) -> PlayerId {
    engine.state().locate(name).unwrap()
}

// =============================================================================
// Ordering
// =============================================================================

/// Priorities [5, 20, 5] submitted by A, B, C resolve as B, A, C.
#[test]
fn test_descending_priority_with_stable_ties() {
    let state = MatchState::new(roster(&[("T1", &["a", "b"]), ("T2", &["c"])]), 0).unwrap();
    let mut engine = TurnEngine::new(drill_rules(), state, 1).unwrap();

    let mut source = ScriptedMoves::new(["a 01", "b 02", "c 03"]);
    let report = engine.play_round(&mut source, &mut BufferedSink::new()).unwrap();

    let order: Vec<_> = report.resolved.iter().map(|(caster, _)| *caster).collect();
    assert_eq!(order, vec![id(&engine, "b"), id(&engine, "a"), id(&engine, "c")]);
}

/// A replaced move is ordered by the arrival of its replacement.
#[test]
fn test_overwrite_moves_to_new_arrival_slot() {
    let state = MatchState::new(roster(&[("T1", &["a", "b"]), ("T2", &["c"])]), 0).unwrap();
    let mut engine = TurnEngine::new(drill_rules(), state, 1).unwrap();

    // a first submits Fast, then swaps to Slow A after c's Slow C
    let mut source = ScriptedMoves::new(["a 02", "c 03", "a 01", "b 02"]);
    let mut sink = BufferedSink::new();
    let report = engine.play_round(&mut source, &mut sink).unwrap();

    let order: Vec<_> = report.resolved.iter().map(|(caster, _)| *caster).collect();
    assert_eq!(order, vec![id(&engine, "b"), id(&engine, "c"), id(&engine, "a")]);
    assert_eq!(sink.count("move_updated"), 1);
}

// =============================================================================
// Accepted casters
// =============================================================================

/// Resolved plus fizzled casters equal the eligible set at round start.
#[test]
fn test_accepted_casters_match_eligible_set() {
    let config = MatchConfig::new(1)
        .with_team(TeamSpec::new("Owls").with_member("ann").with_member("amy"))
        .with_team(TeamSpec::new("Cats").with_member("bob").with_member("bea"));
    let engine = TurnEngine::from_config(&config, Rulebook::standard()).unwrap();

    // bea is already dead; ann's Suicide resolves last, after bob's Blizzard
    let bea = id(&engine, "bea");
    let ann = id(&engine, "ann");
    let amy = id(&engine, "amy");
    let bob = id(&engine, "bob");
    let mut state = engine.into_state();
    state.player_mut(bea).unwrap().kill();
    let mut engine = TurnEngine::new(Rulebook::standard(), state, 1).unwrap();

    let mut source = ScriptedMoves::new(["bea 01", "ann 05", "amy 01", "bob 21"]);
    let mut sink = BufferedSink::new();
    let report = engine.play_round(&mut source, &mut sink).unwrap();

    assert_eq!(report.eligible, vec![ann, amy, bob]);
    assert_eq!(sink.count("wrong_caster"), 1);

    let mut accepted: Vec<_> = report
        .resolved
        .iter()
        .map(|(c, _)| *c)
        .chain(report.fizzled.iter().copied())
        .collect();
    accepted.sort();
    assert_eq!(accepted, report.eligible);
    assert!(report.fizzled.is_empty());
}

/// A player who dies stays out of the eligible set for later rounds.
#[test]
fn test_dead_caster_leaves_eligible_set() {
    let state = MatchState::new(roster(&[("T1", &["a"]), ("T2", &["b"])]), 0).unwrap();
    let mut engine = TurnEngine::new(Rulebook::standard(), state, 2).unwrap();
    let b = id(&engine, "b");

    // Fire Arrow (27) lands before Suicide (1); b is still alive to cast it
    let mut source = ScriptedMoves::new(["b 05", "a 11 b"]);
    let mut sink = BufferedSink::new();
    let report = engine.play_round(&mut source, &mut sink).unwrap();
    assert!(report.fizzled.is_empty());
    assert_eq!(report.resolved.len(), 2);
    assert!(engine.state().player(b).unwrap().is_dead());
    assert_eq!(sink.count("killed"), 1);

    let mut source = ScriptedMoves::new(["b 01", "a 01"]);
    let report = engine.play_round(&mut source, &mut sink).unwrap();
    assert!(!report.eligible.contains(&b));
    assert_eq!(sink.count("wrong_caster"), 1);
}

/// A massive attack can kill a slower caster before their slot.
#[test]
fn test_massive_spell_causes_fizzle() {
    let state = MatchState::new(roster(&[("T1", &["a"]), ("T2", &["b", "c"])]), 0).unwrap();
    let mut engine = TurnEngine::new(Rulebook::standard(), state, 1).unwrap();
    let c = id(&engine, "c");
    {
        let mut state = engine.into_state();
        state.player_mut(c).unwrap().damage(28);
        engine = TurnEngine::new(Rulebook::standard(), state, 1).unwrap();
    }

    // Blizzard (25) lands before Meditation (21)
    let mut source = ScriptedMoves::new(["c 01", "b 01", "a 21"]);
    let mut sink = BufferedSink::new();
    let report = engine.play_round(&mut source, &mut sink).unwrap();

    assert_eq!(report.fizzled, vec![c]);
    assert!(sink
        .notices()
        .iter()
        .any(|n| matches!(n, Notice::Fizzled { caster, .. } if caster == "c")));
}

// =============================================================================
// Deadline
// =============================================================================

/// A spent submission budget turns pending casters into passes.
#[test]
fn test_deadline_substitutes_passes() {
    let state = MatchState::new(roster(&[("T1", &["a"]), ("T2", &["b"])]), 0).unwrap();
    let mut engine = TurnEngine::new(Rulebook::standard(), state, 1)
        .unwrap()
        .with_deadline(RoundDeadline::none().with_max_submissions(2));
    let a = id(&engine, "a");
    let b = id(&engine, "b");

    let mut source = ScriptedMoves::new(["b 99", "b 98", "a 01", "b 01"]);
    let mut sink = BufferedSink::new();
    let report = engine.play_round(&mut source, &mut sink).unwrap();

    assert_eq!(report.passed, vec![a, b]);
    assert!(report.resolved.is_empty());
    assert_eq!(sink.count("spell_not_exists"), 2);
    assert_eq!(sink.count("deadline_pass"), 2);
    // The round closed; the remaining lines wait for the next one
    assert_eq!(source.remaining(), 2);
}

// =============================================================================
// Scenarios
// =============================================================================

/// Two one-player teams over two rounds: restore against strike.
#[test]
fn test_two_round_duel() {
    let state = MatchState::new(roster(&[("Owls", &["a"]), ("Cats", &["b"])]), 0).unwrap();
    let mut engine = TurnEngine::new(drill_rules(), state, 2).unwrap();
    let a = id(&engine, "a");
    let b = id(&engine, "b");

    let mut source = ScriptedMoves::new(["a 04", "b 11 a", "a 04", "b 11 a"]);
    let mut sink = BufferedSink::new();

    engine.play_round(&mut source, &mut sink).unwrap();
    assert_eq!(engine.state().player(a).unwrap().hp(), 25);
    assert_eq!(engine.state().player(a).unwrap().mana(), 34);
    assert_eq!(engine.state().player(b).unwrap().hp(), 30);

    let result = engine.run(&mut source, &mut sink).unwrap();
    assert_eq!(engine.state().round(), 2);
    assert_eq!(engine.state().player(a).unwrap().hp(), 20);
    assert_eq!(engine.state().player(a).unwrap().mana(), 38);

    // 58 against 60
    assert_eq!(result, MatchResult::Winner("Cats".into()));
    assert_eq!(sink.keys().last(), Some(&"winner"));
}

/// An effect with two rounds left survives one tick and expires at the second.
#[test]
fn test_effect_expires_on_second_tick() {
    let state = MatchState::new(roster(&[("Owls", &["a"]), ("Cats", &["b"])]), 0).unwrap();
    let mut engine = TurnEngine::new(drill_rules(), state, 2).unwrap();
    let a = id(&engine, "a");

    let mut state = engine.into_state();
    state
        .player_mut(a)
        .unwrap()
        .add_effect(EffectRegistry::standard(), ActiveEffect::for_rounds(MANA_RESIST, 2))
        .unwrap();
    let mut engine = TurnEngine::new(drill_rules(), state, 2).unwrap();

    let mut source = ScriptedMoves::new(["a 01", "b 01", "a 01", "b 01"]);
    let mut sink = BufferedSink::new();

    engine.play_round(&mut source, &mut sink).unwrap();
    let effects: Vec<_> = engine.state().player(a).unwrap().effects().iter().cloned().collect();
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].remaining, EffectDuration::Rounds(1));
    assert_eq!(sink.count("effect_expired"), 0);

    engine.play_round(&mut source, &mut sink).unwrap();
    assert!(engine.state().player(a).unwrap().effects().is_empty());
    assert_eq!(sink.count("effect_expired"), 1);
}

/// Elimination does not end the match early; a wiped team scores 0.
#[test]
fn test_no_early_termination() {
    let state = MatchState::new(roster(&[("Owls", &["a"]), ("Cats", &["b"])]), 0).unwrap();
    let mut engine = TurnEngine::new(Rulebook::standard(), state, 3).unwrap();

    let mut source = ScriptedMoves::new(["b 05", "a 01", "a 01", "a 01"]);
    let mut sink = BufferedSink::new();
    let result = engine.run(&mut source, &mut sink).unwrap();

    assert_eq!(engine.state().round(), 3);
    assert_eq!(sink.count("new_round"), 3);
    assert_eq!(result, MatchResult::Winner("Owls".into()));
}

/// Equal team scores end in a draw reported by title.
#[test]
fn test_draw_when_nobody_acts() {
    let state = MatchState::new(roster(&[("Zebras", &["z"]), ("Ants", &["x"])]), 0).unwrap();
    let mut engine = TurnEngine::new(Rulebook::standard(), state, 1).unwrap();

    let mut sink = BufferedSink::new();
    let result = engine.run(&mut ScriptedMoves::default(), &mut sink).unwrap();

    assert_eq!(result, MatchResult::Draw(vec!["Ants".into(), "Zebras".into()]));
    assert_eq!(sink.keys().last(), Some(&"draw"));
}

/// The same seed and moves replay the same match, chance rolls included.
#[test]
fn test_seeded_replay_is_identical() {
    let play = |seed: u64| {
        let config = MatchConfig::new(6)
            .with_seed(seed)
            .with_team(TeamSpec::new("Owls").with_member("ann"))
            .with_team(TeamSpec::new("Cats").with_member("bob"));
        let mut engine = TurnEngine::from_config(&config, Rulebook::standard()).unwrap();
        let lines: Vec<String> = (0..6)
            .flat_map(|_| ["ann 03".to_string(), "bob 12 ann".to_string()])
            .collect();
        let mut sink = BufferedSink::new();
        engine.run(&mut ScriptedMoves::new(lines), &mut sink).unwrap();
        let ann = engine.state().locate("ann").unwrap();
        (
            engine.state().player(ann).unwrap().snapshot(),
            engine.state().rng().checkpoint(),
            sink.take(),
        )
    };

    assert_eq!(play(17), play(17));
}

/// A match saved between rounds resumes with the same chance rolls.
#[test]
fn test_resume_from_checkpoint() {
    let config = MatchConfig::new(6)
        .with_seed(23)
        .with_team(TeamSpec::new("Owls").with_member("ann"))
        .with_team(TeamSpec::new("Cats").with_member("bob"));
    // Below the threshold every Defence rolls for its strip
    let round = || ScriptedMoves::new(["ann 03", "bob 01"]);
    let resolved = |sink: &mut BufferedSink| -> Vec<Notice> {
        sink.take().into_iter().filter(|n| matches!(n, Notice::Resolved(_))).collect()
    };

    let mut engine = TurnEngine::from_config(&config, Rulebook::standard()).unwrap();
    let mut sink = BufferedSink::new();
    for _ in 0..3 {
        engine.play_round(&mut round(), &mut sink).unwrap();
    }
    let saved =
        ["ann", "bob"].map(|name| engine.state().player(id(&engine, name)).unwrap().snapshot());
    let checkpoint = engine.state().rng().checkpoint();

    sink.take();
    for _ in 0..3 {
        engine.play_round(&mut round(), &mut sink).unwrap();
    }
    let expected = resolved(&mut sink);

    // Rebuild from a differently seeded state
    let mut state = TurnEngine::from_config(&config.clone().with_seed(0), Rulebook::standard())
        .unwrap()
        .into_state();
    for (name, snapshot) in ["ann", "bob"].iter().zip(&saved) {
        let player = state.locate(name).unwrap();
        state
            .player_mut(player)
            .unwrap()
            .load(EffectRegistry::standard(), snapshot)
            .unwrap();
    }
    state.resume_rng(&checkpoint);
    let mut resumed = TurnEngine::new(Rulebook::standard(), state, 3).unwrap();

    let mut sink = BufferedSink::new();
    for _ in 0..3 {
        resumed.play_round(&mut round(), &mut sink).unwrap();
    }
    assert_eq!(resolved(&mut sink), expected);
    assert_ne!(engine.state().rng().checkpoint(), checkpoint);
    assert_eq!(resumed.state().rng().checkpoint(), engine.state().rng().checkpoint());
    assert_eq!(
        resumed.state().player(id(&resumed, "ann")).unwrap().snapshot(),
        engine.state().player(id(&engine, "ann")).unwrap().snapshot()
    );
}
