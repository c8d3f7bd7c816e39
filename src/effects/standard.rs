//! The standard effect kinds used by the standard spell book.

use super::kind::{EffectKind, EffectKindId, Polarity, Pulse, ReactionTiming};
use super::registry::EffectRegistry;

pub const MANA_RESIST: EffectKindId = EffectKindId::new(1);
pub const PROPHECY: EffectKindId = EffectKindId::new(2);
pub const FALLING: EffectKindId = EffectKindId::new(3);
pub const LEVITATE: EffectKindId = EffectKindId::new(4);
pub const DAMAGE_RESIST: EffectKindId = EffectKindId::new(5);
pub const BURN: EffectKindId = EffectKindId::new(6);
pub const POISON: EffectKindId = EffectKindId::new(7);
pub const REGENERATION: EffectKindId = EffectKindId::new(8);
pub const NIGHTMARE: EffectKindId = EffectKindId::new(9);
pub const MAGIC_SHIELD: EffectKindId = EffectKindId::new(10);

pub(super) fn effects() -> EffectRegistry {
    let kinds = [
        EffectKind::new(MANA_RESIST, "Mana Resist", Polarity::Buff),
        EffectKind::new(PROPHECY, "Prophecy", Polarity::Buff)
            .with_timing(ReactionTiming::OnAction)
            .with_pulse(Pulse::mana_restore(1)),
        EffectKind::new(FALLING, "Falling", Polarity::Debuff),
        EffectKind::new(LEVITATE, "Levitate", Polarity::Debuff),
        EffectKind::new(DAMAGE_RESIST, "Damage Resist", Polarity::Buff),
        // Burning only goes out under a hard dispel
        EffectKind::new(BURN, "Burn", Polarity::Debuff)
            .unclearable()
            .with_timing(ReactionTiming::PostRound)
            .with_pulse(Pulse::damage(1)),
        EffectKind::new(POISON, "Poison", Polarity::Debuff)
            .with_timing(ReactionTiming::PostRound)
            .with_pulse(Pulse::damage(2)),
        EffectKind::new(REGENERATION, "Regeneration", Polarity::Buff)
            .with_timing(ReactionTiming::PostRound)
            .with_pulse(Pulse::heal(3)),
        EffectKind::new(NIGHTMARE, "Nightmare", Polarity::Debuff)
            .incapacitating()
            .with_pulse(Pulse::mana_burn(2)),
        EffectKind::new(MAGIC_SHIELD, "Magic Shield", Polarity::Buff),
    ];

    let mut registry = EffectRegistry::new();
    for kind in kinds {
        let registered = registry.register(kind);
        debug_assert!(registered.is_ok(), "{:?}", registered);
    }
    registry
}
