//! The standard spell book.
//!
//! Level 0 holds self-targeted utility spells, level 1 the directed
//! duel spells, level 2 the massive spells and the hard dispel.

use super::behavior::{EffectGrant, SpellBehavior, SpellEffect};
use super::catalog::SpellCatalog;
use super::definition::{Spell, SpellCategory, SpellId};
use super::targeting::{Side, TargetType};
use crate::effects::standard::{
    BURN, DAMAGE_RESIST, FALLING, LEVITATE, MAGIC_SHIELD, MANA_RESIST, NIGHTMARE, POISON,
    PROPHECY, REGENERATION,
};
use crate::effects::ClearMode;

pub const MEDITATION: SpellId = SpellId::new(0, 1);
pub const RUN: SpellId = SpellId::new(0, 2);
pub const DEFENCE: SpellId = SpellId::new(0, 3);
pub const LEVITATION: SpellId = SpellId::new(0, 4);
pub const SUICIDE: SpellId = SpellId::new(0, 5);
pub const FORTUNE: SpellId = SpellId::new(0, 6);
pub const FIRST_AID: SpellId = SpellId::new(0, 7);

pub const FIRE_ARROW: SpellId = SpellId::new(1, 1);
pub const POISON_SPIT: SpellId = SpellId::new(1, 2);
pub const HEALING: SpellId = SpellId::new(1, 12);
pub const NIGHTMARE_SPELL: SpellId = SpellId::new(1, 15);
pub const DISPELLING: SpellId = SpellId::new(1, 19);
pub const MAGIC_SHIELD_SPELL: SpellId = SpellId::new(1, 24);

pub const BLIZZARD: SpellId = SpellId::new(2, 1);
pub const MENDING_AURA: SpellId = SpellId::new(2, 2);
pub const CATACLYSM: SpellId = SpellId::new(2, 3);
pub const PURGE: SpellId = SpellId::new(2, 4);

/// Probability that Defence strips an effect below the threshold.
pub const DEFENCE_STRIP_CHANCE: f64 = 0.4;

/// Spells every player starts with in the standard setup.
#[must_use]
pub fn starting_spells() -> Vec<SpellId> {
    vec![
        MEDITATION, RUN, DEFENCE, LEVITATION, FIRST_AID, FIRE_ARROW, POISON_SPIT, HEALING,
        DISPELLING, MAGIC_SHIELD_SPELL,
    ]
}

pub(super) fn spells() -> SpellCatalog {
    let enemy = TargetType::Directed { side: Side::Enemy };
    let ally = TargetType::Directed { side: Side::Ally };
    let anyone = TargetType::Directed { side: Side::All };

    let book = [
        Spell::new(
            MEDITATION,
            "Meditation",
            21,
            TargetType::Caster,
            SpellBehavior::Generic(
                SpellEffect::new()
                    .restore_mana(3)
                    .grant(EffectGrant::rounds(MANA_RESIST, 3))
                    .grant(EffectGrant::rounds(PROPHECY, 2)),
            ),
        ),
        Spell::new(
            RUN,
            "Run",
            18,
            TargetType::Caster,
            SpellBehavior::Generic(
                SpellEffect::new()
                    .add_armor(1)
                    .grant(EffectGrant::rounds(FALLING, 1)),
            ),
        ),
        Spell::new(
            DEFENCE,
            "Defence",
            20,
            TargetType::Caster,
            SpellBehavior::Defence {
                ward: EffectGrant::rounds(DAMAGE_RESIST, 2),
                threshold: 2,
                strip_chance: DEFENCE_STRIP_CHANCE,
            },
        )
        .with_category(SpellCategory::Defence),
        Spell::new(
            LEVITATION,
            "Levitation",
            20,
            TargetType::Caster,
            SpellBehavior::Generic(
                SpellEffect::new()
                    .restore_mana(1)
                    .grant(EffectGrant::rounds(LEVITATE, 1)),
            ),
        ),
        Spell::new(SUICIDE, "Suicide", 1, TargetType::Caster, SpellBehavior::Kill),
        Spell::new(FORTUNE, "Fortune", 24, TargetType::Caster, SpellBehavior::Shuffle),
        Spell::new(
            FIRST_AID,
            "First Aid",
            23,
            TargetType::Caster,
            SpellBehavior::Generic(SpellEffect::new().raise_max_hp(2).heal(4)),
        )
        .with_category(SpellCategory::Defence),
        Spell::new(
            FIRE_ARROW,
            "Fire Arrow",
            27,
            enemy,
            SpellBehavior::Generic(
                SpellEffect::new()
                    .damage(6)
                    .grant(EffectGrant::persistent(BURN)),
            ),
        )
        .with_category(SpellCategory::Attack),
        Spell::new(
            POISON_SPIT,
            "Poison Spit",
            27,
            enemy,
            SpellBehavior::Generic(SpellEffect::new().grant(EffectGrant::rounds(POISON, 4))),
        )
        .with_category(SpellCategory::Attack),
        Spell::new(
            HEALING,
            "Healing",
            27,
            ally,
            SpellBehavior::Generic(SpellEffect::new().grant(EffectGrant::rounds(REGENERATION, 3))),
        )
        .with_category(SpellCategory::Defence),
        // Two rounds: the tick of the casting round eats one
        Spell::new(
            NIGHTMARE_SPELL,
            "Nightmare",
            28,
            enemy,
            SpellBehavior::Generic(SpellEffect::new().grant(EffectGrant::rounds(NIGHTMARE, 2))),
        )
        .with_category(SpellCategory::Attack),
        Spell::new(DISPELLING, "Dispelling", 22, anyone, SpellBehavior::Dispel(ClearMode::Normal)),
        Spell::new(
            MAGIC_SHIELD_SPELL,
            "Magic Shield",
            21,
            ally,
            SpellBehavior::Generic(
                SpellEffect::new().grant(EffectGrant::rounds(MAGIC_SHIELD, 3).locked()),
            ),
        )
        .with_category(SpellCategory::Defence),
        Spell::new(
            BLIZZARD,
            "Blizzard",
            25,
            TargetType::Massive { side: Side::Enemy },
            SpellBehavior::Generic(SpellEffect::new().damage(3).remove_armor(1)),
        )
        .with_category(SpellCategory::Attack),
        Spell::new(
            MENDING_AURA,
            "Mending Aura",
            22,
            TargetType::Massive { side: Side::Ally },
            SpellBehavior::Generic(SpellEffect::new().heal(3)),
        )
        .with_category(SpellCategory::Defence),
        Spell::new(
            CATACLYSM,
            "Cataclysm",
            10,
            TargetType::Massive { side: Side::All },
            SpellBehavior::Generic(SpellEffect::new().damage(4).burn_mana(2)),
        )
        .with_category(SpellCategory::Attack),
        Spell::new(PURGE, "Purge", 22, anyone, SpellBehavior::Dispel(ClearMode::Hard)),
    ];

    let mut catalog = SpellCatalog::new();
    for spell in book {
        let registered = catalog.register(spell);
        debug_assert!(registered.is_ok(), "{:?}", registered);
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectRegistry;

    #[test]
    fn test_book_is_complete() {
        let catalog = SpellCatalog::standard();
        assert_eq!(catalog.len(), 17);
        for id in starting_spells() {
            assert!(catalog.contains(id), "missing starting spell {}", id);
        }
    }

    #[test]
    fn test_grants_reference_registered_effects() {
        let registry = EffectRegistry::standard();
        for id in SpellCatalog::standard().ids() {
            let spell = SpellCatalog::standard().get(id).unwrap();
            let grants = match &spell.behavior {
                SpellBehavior::Generic(bag) => bag.grants.clone(),
                SpellBehavior::Defence { ward, .. } => vec![*ward],
                _ => Vec::new(),
            };
            for grant in grants {
                assert!(registry.contains(grant.kind), "{} grants unknown {}", id, grant.kind);
            }
        }
    }

    #[test]
    fn test_priorities() {
        let catalog = SpellCatalog::standard();
        assert_eq!(catalog.get(NIGHTMARE_SPELL).unwrap().priority, 28);
        assert_eq!(catalog.get(SUICIDE).unwrap().priority, 1);
        assert_eq!(catalog.get(MEDITATION).unwrap().priority, 21);
    }
}
