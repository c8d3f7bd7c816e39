//! Scoring and win evaluation.
//!
//! A living player scores `hp + mana`, a dead one 0; a team scores the
//! sum of its members. The match goes to the highest team score, with
//! ties reported as a draw.

use serde::{Deserialize, Serialize};

use crate::core::MatchState;

/// Result of a completed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// Single winning team, by title.
    Winner(String),
    /// Teams sharing the top score, sorted by title.
    Draw(Vec<String>),
}

impl MatchResult {
    /// Check if a team won or shares the draw.
    #[must_use]
    pub fn is_winner(&self, title: &str) -> bool {
        match self {
            MatchResult::Winner(t) => t == title,
            MatchResult::Draw(ts) => ts.iter().any(|t| t == title),
        }
    }

    /// Titles of every team at the top score.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        match self {
            MatchResult::Winner(t) => vec![t.as_str()],
            MatchResult::Draw(ts) => ts.iter().map(String::as_str).collect(),
        }
    }
}

/// Pick the winner(s) from `(title, score)` pairs.
///
/// Keeps a running maximum: a strictly larger score resets the set, an
/// equal one joins it.
///
/// ```
/// use astral_engine::rules::{evaluate_winners, MatchResult};
///
/// let result = evaluate_winners([("T3", 30), ("T2", 40), ("T1", 40)]);
/// assert_eq!(result, MatchResult::Draw(vec!["T1".into(), "T2".into()]));
/// ```
pub fn evaluate_winners<'a>(scores: impl IntoIterator<Item = (&'a str, u64)>) -> MatchResult {
    let mut best: Option<u64> = None;
    let mut leaders: Vec<String> = Vec::new();

    for (title, score) in scores {
        match best {
            Some(max) if score < max => {}
            Some(max) if score == max => leaders.push(title.to_string()),
            _ => {
                best = Some(score);
                leaders.clear();
                leaders.push(title.to_string());
            }
        }
    }

    if leaders.len() == 1 {
        MatchResult::Winner(leaders.remove(0))
    } else {
        leaders.sort();
        MatchResult::Draw(leaders)
    }
}

/// `(title, score)` of every team, in team order.
#[must_use]
pub fn standings(state: &MatchState) -> Vec<(String, u64)> {
    state
        .teams()
        .map(|(_, team)| (team.title().to_string(), team.score()))
        .collect()
}

/// Evaluate the winner(s) of `state`.
#[must_use]
pub fn evaluate(state: &MatchState) -> MatchResult {
    let standings = standings(state);
    evaluate_winners(standings.iter().map(|(title, score)| (title.as_str(), *score)))
}
