//! Attack resolution.
//!
//! Attacks always land: there is no hit roll, no armor, no variance. Damage
//! is the attacker's base strength clamped to the defender's remaining
//! health. The only way an attack fails is a defender that is already dead.

use crate::entity::EntityId;
use crate::error::ActionFailure;

use super::Mob;

/// Result of a landed attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub attacker: EntityId,
    pub defender: EntityId,
    /// Health actually removed from the defender.
    pub damage: u32,
    /// The defender's health reached zero with this hit.
    pub killed: bool,
}

/// Applies `strength` damage from `attacker` to `defender`.
pub fn resolve_attack(
    attacker: EntityId,
    strength: u32,
    defender: &mut Mob,
) -> Result<Hit, ActionFailure> {
    if defender.dead() {
        return Err(ActionFailure::TargetAlreadyDead {
            target: defender.id(),
        });
    }

    let damage = defender.attacked_for(strength);
    Ok(Hit {
        attacker,
        defender: defender.id(),
        damage,
        killed: defender.dead(),
    })
}

impl Mob {
    /// Attacks `defender` with this mob's base strength.
    pub fn attack(&self, defender: &mut Mob) -> Result<Hit, ActionFailure> {
        resolve_attack(self.id(), self.attack_strength(), defender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Item, ItemKind};

    fn orc(id: u32, health: u32, strength: u32) -> Mob {
        Mob::monster(EntityId(id), "orc", 'o')
            .with_health(health)
            .with_attack_strength(strength)
    }

    #[test]
    fn attack_always_lands_for_base_strength() {
        let attacker = orc(1, 10, 3);
        let mut defender = orc(2, 10, 1);
        let hit = attacker.attack(&mut defender).unwrap();
        assert_eq!(hit.damage, 3);
        assert!(!hit.killed);
        assert_eq!(defender.health(), 7);
    }

    #[test]
    fn overkill_is_clamped_to_zero_health() {
        let attacker = orc(1, 10, 9);
        let mut defender = orc(2, 4, 1);
        let hit = attacker.attack(&mut defender).unwrap();
        assert_eq!(hit.damage, 4);
        assert!(hit.killed);
        assert_eq!(defender.health(), 0);
        assert!(defender.dead());
    }

    #[test]
    fn attacking_the_dead_fails_without_effect() {
        let attacker = orc(1, 10, 9);
        let mut defender = orc(2, 4, 1);
        attacker.attack(&mut defender).unwrap();
        assert_eq!(
            attacker.attack(&mut defender),
            Err(ActionFailure::TargetAlreadyDead { target: EntityId(2) })
        );
        assert_eq!(defender.health(), 0);
    }

    #[test]
    fn carried_weapon_does_not_change_damage() {
        let dagger = Item::new(EntityId(3), "dagger", ')', 5)
            .with_kind(ItemKind::Weapon { attack_strength: 4 });
        let attacker = orc(1, 10, 2).with_item(dagger);
        let mut defender = orc(2, 10, 1);
        assert_eq!(attacker.attack(&mut defender).unwrap().damage, 2);
    }
}
