//! Notices and message sinks.
//!
//! The engine reports everything players should see as a `Notice`: a
//! stable message key plus positional arguments. Turning that into
//! localized text is the sink's business; `Display` gives plain English
//! for hosts that need nothing more.

use std::io::Write;

use tracing::{info, warn};

use crate::effects::{EffectKindId, Pulse};
use crate::error::MoveError;
use crate::spells::{Outcome, SpellId};

/// Why a caster passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassReason {
    Deadline,
    SourceExhausted,
}

/// A player-facing event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    NewRound { round: u32 },
    MoveSaved { caster: String },
    MoveUpdated { caster: String },
    MoveRejected { error: MoveError },
    Passed { caster: String, reason: PassReason },
    SpellCast { caster: String, spell: SpellId, title: String },
    Fizzled { caster: String, spell: SpellId },
    Resolved(Outcome),
    Pulsed { target: String, effect: EffectKindId, applied: Pulse },
    EffectExpired { target: String, effect: EffectKindId },
    RoundSummary { round: u32, standings: Vec<(String, u64)> },
    Winner { title: String },
    Draw { titles: Vec<String> },
}

impl Notice {
    /// Stable message key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Notice::NewRound { .. } => "new_round",
            Notice::MoveSaved { .. } => "move_saved",
            Notice::MoveUpdated { .. } => "move_updated",
            Notice::MoveRejected { error } => error.key(),
            Notice::Passed { reason: PassReason::Deadline, .. } => "deadline_pass",
            Notice::Passed { reason: PassReason::SourceExhausted, .. } => "source_exhausted",
            Notice::SpellCast { .. } => "spell_cast",
            Notice::Fizzled { .. } => "fizzle",
            Notice::Resolved(outcome) => match outcome {
                Outcome::Damaged { .. } => "damaged",
                Outcome::Healed { .. } => "healed",
                Outcome::ManaRestored { .. } => "mana_restored",
                Outcome::ManaBurned { .. } => "mana_burned",
                Outcome::ArmorGained { .. } => "armor_gained",
                Outcome::ArmorLost { .. } => "armor_lost",
                Outcome::MaxHpRaised { .. } => "max_hp_raised",
                Outcome::EffectGranted { .. } => "effect_granted",
                Outcome::Killed { .. } => "killed",
                Outcome::Dispelled { .. } => "dispelled",
                Outcome::Stripped { .. } => "stripped",
                Outcome::Reshuffled { .. } => "reshuffled",
                Outcome::TargetFallen { .. } => "target_fallen",
            },
            Notice::Pulsed { .. } => "effect_pulse",
            Notice::EffectExpired { .. } => "effect_expired",
            Notice::RoundSummary { .. } => "round_summary",
            Notice::Winner { .. } => "winner",
            Notice::Draw { .. } => "draw",
        }
    }

    /// Positional template arguments.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self {
            Notice::NewRound { round } => vec![round.to_string()],
            Notice::MoveSaved { caster }
            | Notice::MoveUpdated { caster }
            | Notice::Passed { caster, .. } => vec![caster.clone()],
            Notice::MoveRejected { error } => match error {
                MoveError::EmptyMove => Vec::new(),
                MoveError::UnknownSpell(token) => vec![token.clone()],
                MoveError::UnknownPlayer(name) | MoveError::IneligibleCaster(name) => {
                    vec![name.clone()]
                }
                MoveError::MissingTarget(spell) => vec![spell.to_string()],
                MoveError::IllegalTarget { target, spell, reason } => {
                    vec![target.clone(), spell.to_string(), (*reason).to_string()]
                }
            },
            Notice::SpellCast { caster, spell, title } => {
                vec![caster.clone(), spell.to_string(), title.clone()]
            }
            Notice::Fizzled { caster, spell } => vec![caster.clone(), spell.to_string()],
            Notice::Resolved(outcome) => {
                let target = outcome.target().to_string();
                match outcome {
                    Outcome::Damaged { amount, .. }
                    | Outcome::Healed { amount, .. }
                    | Outcome::ManaRestored { amount, .. }
                    | Outcome::ManaBurned { amount, .. }
                    | Outcome::ArmorGained { amount, .. }
                    | Outcome::ArmorLost { amount, .. }
                    | Outcome::MaxHpRaised { amount, .. } => vec![target, amount.to_string()],
                    Outcome::EffectGranted { effect, .. } | Outcome::Stripped { effect, .. } => {
                        vec![target, effect.raw().to_string()]
                    }
                    Outcome::Dispelled { removed, .. } => vec![target, removed.len().to_string()],
                    Outcome::Reshuffled { count, .. } => vec![target, count.to_string()],
                    Outcome::Killed { .. } | Outcome::TargetFallen { .. } => vec![target],
                }
            }
            Notice::Pulsed { target, effect, .. } | Notice::EffectExpired { target, effect } => {
                vec![target.clone(), effect.raw().to_string()]
            }
            Notice::RoundSummary { round, standings } => {
                let mut args = vec![round.to_string()];
                for (title, score) in standings {
                    args.push(format!("{}={}", title, score));
                }
                args
            }
            Notice::Winner { title } => vec![title.clone()],
            Notice::Draw { titles } => titles.clone(),
        }
    }

    /// Warnings are the notices that go with a rejected move or a pass.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Notice::MoveRejected { .. } | Notice::Passed { .. })
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::NewRound { round } => write!(f, "Round {} begins", round),
            Notice::MoveSaved { caster } => write!(f, "Move of {} saved", caster),
            Notice::MoveUpdated { caster } => write!(f, "Move of {} updated", caster),
            Notice::MoveRejected { error } => write!(f, "Move rejected: {}", error),
            Notice::Passed { caster, reason: PassReason::Deadline } => {
                write!(f, "{} ran out of time and passes", caster)
            }
            Notice::Passed { caster, reason: PassReason::SourceExhausted } => {
                write!(f, "No more moves; {} passes", caster)
            }
            Notice::SpellCast { caster, spell, title } => {
                write!(f, "{} casts {} ({})", caster, title, spell)
            }
            Notice::Fizzled { caster, spell } => {
                write!(f, "Spell {} of {} fizzles", spell, caster)
            }
            Notice::Resolved(outcome) => match outcome {
                Outcome::Damaged { target, amount } => {
                    write!(f, "{} takes {} damage", target, amount)
                }
                Outcome::Healed { target, amount } => write!(f, "{} heals {} hp", target, amount),
                Outcome::ManaRestored { target, amount } => {
                    write!(f, "{} restores {} mana", target, amount)
                }
                Outcome::ManaBurned { target, amount } => {
                    write!(f, "{} loses {} mana", target, amount)
                }
                Outcome::ArmorGained { target, amount } => {
                    write!(f, "{} gains {} armor", target, amount)
                }
                Outcome::ArmorLost { target, amount } => {
                    write!(f, "{} loses {} armor", target, amount)
                }
                Outcome::MaxHpRaised { target, amount } => {
                    write!(f, "{} gains {} max hp", target, amount)
                }
                Outcome::EffectGranted { target, effect } => {
                    write!(f, "{} gains {}", target, effect)
                }
                Outcome::Killed { target } => write!(f, "{} dies", target),
                Outcome::Dispelled { target, removed } => {
                    write!(f, "{} loses {} effect(s)", target, removed.len())
                }
                Outcome::Stripped { target, effect } => write!(f, "{} sheds {}", target, effect),
                Outcome::Reshuffled { target, count } => {
                    write!(f, "{} draws {} new spell(s)", target, count)
                }
                Outcome::TargetFallen { target } => write!(f, "{} has already fallen", target),
            },
            Notice::Pulsed { target, effect, .. } => write!(f, "{} reacts on {}", effect, target),
            Notice::EffectExpired { target, effect } => {
                write!(f, "{} wears off {}", effect, target)
            }
            Notice::RoundSummary { round, standings } => {
                write!(f, "Round {} ends:", round)?;
                for (title, score) in standings {
                    write!(f, " {}={}", title, score)?;
                }
                Ok(())
            }
            Notice::Winner { title } => write!(f, "Team {} wins", title),
            Notice::Draw { titles } => write!(f, "Draw between {}", titles.join(", ")),
        }
    }
}

/// Receives notices from the engine.
pub trait MessageSink {
    fn emit(&mut self, notice: &Notice);
}

/// Keeps every notice in memory.
#[derive(Clone, Debug, Default)]
pub struct BufferedSink {
    notices: Vec<Notice>,
}

impl BufferedSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Message keys in emission order.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        self.notices.iter().map(Notice::key).collect()
    }

    /// Count notices with `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.notices.iter().filter(|n| n.key() == key).count()
    }

    /// Drain the buffer.
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl MessageSink for BufferedSink {
    fn emit(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

/// Forwards notices to `tracing`; warnings at WARN, the rest at INFO.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn emit(&mut self, notice: &Notice) {
        if notice.is_warning() {
            warn!(key = notice.key(), "{}", notice);
        } else {
            info!(key = notice.key(), "{}", notice);
        }
    }
}

/// Writes one English line per notice.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for WriterSink<W> {
    fn emit(&mut self, notice: &Notice) {
        if let Err(err) = writeln!(self.writer, "{}", notice) {
            warn!(key = notice.key(), error = %err, "failed to write notice");
        }
    }
}
