//! Spell resolution - applying a cast to match state.
//!
//! `SpellResolver` interprets a spell's behavior against its targets and
//! reports what actually happened as `Outcome`s. All clamping happens in
//! `Player`; the resolver only decides which mutators to call.

use tracing::debug;

use super::behavior::{EffectGrant, SpellBehavior, SpellEffect};
use super::definition::Spell;
use super::targeting::TargetType;
use crate::core::{MatchState, PlayerId};
use crate::effects::{ClearMode, EffectKindId};
use crate::error::{EngineError, Result};
use crate::rules::Rulebook;

/// One observable result of a resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Damaged { target: String, amount: u32 },
    Healed { target: String, amount: u32 },
    ManaRestored { target: String, amount: u32 },
    ManaBurned { target: String, amount: u32 },
    ArmorGained { target: String, amount: u32 },
    ArmorLost { target: String, amount: u32 },
    MaxHpRaised { target: String, amount: u32 },
    EffectGranted { target: String, effect: EffectKindId },
    Killed { target: String },
    Dispelled { target: String, removed: Vec<EffectKindId> },
    Stripped { target: String, effect: EffectKindId },
    Reshuffled { target: String, count: u32 },
    /// Target was already dead when the spell landed.
    TargetFallen { target: String },
}

impl Outcome {
    /// Name of the player this outcome concerns.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Outcome::Damaged { target, .. }
            | Outcome::Healed { target, .. }
            | Outcome::ManaRestored { target, .. }
            | Outcome::ManaBurned { target, .. }
            | Outcome::ArmorGained { target, .. }
            | Outcome::ArmorLost { target, .. }
            | Outcome::MaxHpRaised { target, .. }
            | Outcome::EffectGranted { target, .. }
            | Outcome::Killed { target }
            | Outcome::Dispelled { target, .. }
            | Outcome::Stripped { target, .. }
            | Outcome::Reshuffled { target, .. }
            | Outcome::TargetFallen { target } => target,
        }
    }
}

/// Resolves spells on match state.
pub struct SpellResolver;

impl SpellResolver {
    /// The players a cast lands on.
    ///
    /// `Caster` spells hit the caster, `Directed` spells the named
    /// targets, `Massive` spells every living player on their side at
    /// the moment of resolution.
    pub fn targets(
        state: &MatchState,
        caster: PlayerId,
        spell: &Spell,
        named: &[PlayerId],
    ) -> Result<Vec<PlayerId>> {
        match spell.target_type {
            TargetType::Caster => Ok(vec![caster]),
            TargetType::Directed { .. } => {
                if named.is_empty() {
                    return Err(EngineError::Invariant(format!(
                        "directed spell {} resolved without a target",
                        spell.id
                    )));
                }
                Ok(named.to_vec())
            }
            TargetType::Massive { side } => state.living_on_side(caster, side),
        }
    }

    /// Resolve `spell` cast by `caster`.
    pub fn resolve(
        state: &mut MatchState,
        rules: &Rulebook,
        caster: PlayerId,
        spell: &Spell,
        named: &[PlayerId],
    ) -> Result<Vec<Outcome>> {
        let targets = Self::targets(state, caster, spell, named)?;
        debug!(spell = %spell.id, caster = %caster, targets = targets.len(), "resolving spell");

        let mut outcomes = Vec::new();
        for target in targets {
            if state.player(target)?.is_dead() {
                outcomes.push(Outcome::TargetFallen {
                    target: state.name_of(target)?,
                });
                continue;
            }
            match &spell.behavior {
                SpellBehavior::Generic(bag) => {
                    Self::apply_bag(state, rules, target, bag, &mut outcomes)?;
                }
                SpellBehavior::Kill => {
                    let player = state.player_mut(target)?;
                    if player.kill() {
                        outcomes.push(Outcome::Killed {
                            target: player.name().to_string(),
                        });
                    }
                }
                SpellBehavior::Dispel(mode) => {
                    let player = state.player_mut(target)?;
                    let removed = player.clear_effects(&rules.effects, *mode)?;
                    outcomes.push(Outcome::Dispelled {
                        target: player.name().to_string(),
                        removed: removed.into_iter().map(|e| e.kind).collect(),
                    });
                }
                SpellBehavior::Shuffle => {
                    Self::reshuffle(state, rules, target, &mut outcomes)?;
                }
                SpellBehavior::Defence {
                    ward,
                    threshold,
                    strip_chance,
                } => {
                    Self::defend(
                        state,
                        rules,
                        target,
                        *ward,
                        *threshold,
                        *strip_chance,
                        &mut outcomes,
                    )?;
                }
            }
        }
        Ok(outcomes)
    }

    fn apply_bag(
        state: &mut MatchState,
        rules: &Rulebook,
        target: PlayerId,
        bag: &SpellEffect,
        outcomes: &mut Vec<Outcome>,
    ) -> Result<()> {
        let player = state.player_mut(target)?;
        let name = player.name().to_string();

        if bag.max_hp_gain > 0 {
            let amount = player.add_max_hp(bag.max_hp_gain);
            outcomes.push(Outcome::MaxHpRaised { target: name.clone(), amount });
        }
        if bag.heal > 0 {
            let amount = player.heal(bag.heal);
            outcomes.push(Outcome::Healed { target: name.clone(), amount });
        }
        if bag.damage > 0 {
            let amount = player.damage(bag.damage);
            outcomes.push(Outcome::Damaged { target: name.clone(), amount });
            if player.is_dead() {
                outcomes.push(Outcome::Killed { target: name });
                return Ok(());
            }
        }
        if bag.mana_restore > 0 {
            let amount = player.restore_mana(bag.mana_restore);
            outcomes.push(Outcome::ManaRestored { target: name.clone(), amount });
        }
        if bag.mana_burn > 0 {
            let amount = player.burn_mana(bag.mana_burn);
            outcomes.push(Outcome::ManaBurned { target: name.clone(), amount });
        }
        if bag.armor_gain > 0 {
            let amount = player.add_armor(bag.armor_gain);
            outcomes.push(Outcome::ArmorGained { target: name.clone(), amount });
        }
        if bag.armor_loss > 0 {
            let amount = player.remove_armor(bag.armor_loss);
            outcomes.push(Outcome::ArmorLost { target: name.clone(), amount });
        }
        for grant in &bag.grants {
            if player.add_effect(&rules.effects, grant.instance())? {
                outcomes.push(Outcome::EffectGranted {
                    target: name.clone(),
                    effect: grant.kind,
                });
            }
        }
        Ok(())
    }

    /// Replace the inventory with as many spells drawn from the catalog.
    fn reshuffle(
        state: &mut MatchState,
        rules: &Rulebook,
        target: PlayerId,
        outcomes: &mut Vec<Outcome>,
    ) -> Result<()> {
        let pool = rules.spells.ids();
        if pool.is_empty() {
            return Err(EngineError::Invariant(
                "cannot reshuffle from an empty catalog".into(),
            ));
        }
        let (player, rng) = state.split_mut(target)?;
        let count = player.spell_total();
        player.clear_spells();
        for id in rng.draw(&pool, count as usize) {
            player.add_spell(id, 1)?;
        }
        outcomes.push(Outcome::Reshuffled {
            target: player.name().to_string(),
            count,
        });
        Ok(())
    }

    /// Strip the oldest clearable effect (certain at `threshold` live
    /// effects, else a roll), then grant the ward.
    #[allow(clippy::too_many_arguments)]
    fn defend(
        state: &mut MatchState,
        rules: &Rulebook,
        target: PlayerId,
        ward: EffectGrant,
        threshold: usize,
        strip_chance: f64,
        outcomes: &mut Vec<Outcome>,
    ) -> Result<()> {
        let (player, rng) = state.split_mut(target)?;
        let name = player.name().to_string();

        let strip = player.effects().live().count() >= threshold || rng.roll(strip_chance);
        if strip {
            let removed = player.remove_oldest_effect(&rules.effects, ClearMode::Normal)?;
            if let Some(removed) = removed {
                outcomes.push(Outcome::Stripped {
                    target: name.clone(),
                    effect: removed.kind,
                });
            }
        }
        if player.add_effect(&rules.effects, ward.instance())? {
            outcomes.push(Outcome::EffectGranted {
                target: name,
                effect: ward.kind,
            });
        }
        Ok(())
    }
}
