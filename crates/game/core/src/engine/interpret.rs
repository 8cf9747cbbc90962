//! The action interpreter shared by the player and monsters.
//!
//! Each handler returns whether the actor used up its turn. Expected
//! failures come back as [`ActionFailure`], get narrated for the player, and
//! leave the turn unconsumed; only invariant breaches propagate as errors.
use tracing::{debug, warn};

use crate::action::MobAction;
use crate::actor::combat::resolve_attack;
use crate::entity::{EntityId, Item};
use crate::error::{ActionFailure, InvariantError};
use crate::geometry::Vector;

use super::{Game, GameEvent};

type Performed = Result<Result<(), ActionFailure>, InvariantError>;

impl Game {
    /// Carries out `action` for `actor`. Returns true if the turn was used.
    pub(super) fn perform(
        &mut self,
        actor: EntityId,
        action: MobAction,
    ) -> Result<bool, InvariantError> {
        let performed = match action {
            MobAction::None => return Ok(false),
            MobAction::Wait => {
                if actor.is_player() {
                    self.narrate("You wait.");
                }
                Ok(Ok(()))
            }
            MobAction::Move(delta) => self.move_or_attack(actor, delta),
            MobAction::Drop(item) => self.drop_item(actor, item),
            MobAction::DropAll => self.drop_all(actor),
            MobAction::PickUpAll => self.pick_up_all(actor),
        }?;

        match performed {
            Ok(()) => Ok(true),
            Err(failure) => {
                self.reject(actor, action, failure);
                Ok(false)
            }
        }
    }

    fn reject(&mut self, actor: EntityId, action: MobAction, failure: ActionFailure) {
        if !actor.is_player() {
            debug!(target: "lumen::engine", %actor, %action, %failure, "mob action failed");
            return;
        }
        warn!(target: "lumen::engine", %action, %failure, "player action failed");
        let text = match failure {
            ActionFailure::Blocked { .. } => "You can't go that way.",
            ActionFailure::NothingToPickUp { .. } => "There is nothing here to pick up.",
            ActionFailure::TargetAlreadyDead { .. } => "It is already dead.",
            ActionFailure::NotHostile { .. } => "You don't want to attack that.",
            ActionFailure::NotInInventory { .. } => "You aren't carrying that.",
        };
        self.narrate(text);
    }

    /// Moves into an empty cell, or attacks the actor standing there.
    fn move_or_attack(&mut self, actor: EntityId, delta: Vector) -> Performed {
        let mover = self.dungeon().expect_mob(actor)?;
        let destination = mover.location() + delta;
        if delta.is_zero() {
            return Ok(Err(ActionFailure::Blocked { destination }));
        }

        if let Some(target) = self.dungeon().mob_at(destination) {
            if !mover.is_hostile_to(target) {
                return Ok(Err(ActionFailure::NotHostile {
                    target: target.id(),
                }));
            }
            let target = target.id();
            return self.attack(actor, target);
        }

        if self.dungeon_mut().move_mob(actor, delta)? {
            Ok(Ok(()))
        } else {
            Ok(Err(ActionFailure::Blocked { destination }))
        }
    }

    fn attack(&mut self, attacker: EntityId, defender: EntityId) -> Performed {
        let (attacker_name, strength) = {
            let mob = self.dungeon().expect_mob(attacker)?;
            (mob.name().to_string(), mob.attack_strength())
        };

        let target = self.dungeon_mut().expect_mob_mut(defender)?;
        let hit = match resolve_attack(attacker, strength, target) {
            Ok(hit) => hit,
            Err(failure) => return Ok(Err(failure)),
        };
        let defender_name = self.dungeon().expect_mob(defender)?.name().to_string();
        self.narrate(format!(
            "{attacker_name} hits {defender_name} for {} damage.",
            hit.damage
        ));
        self.pending_events.push(GameEvent::Attacked(hit));

        if hit.killed {
            self.kill(defender)?;
        }
        Ok(Ok(()))
    }

    /// Drops the corpse and inventory of a mob whose health reached zero.
    /// The mob itself stays until the end-of-turn reaping.
    fn kill(&mut self, mob: EntityId) -> Result<(), InvariantError> {
        let corpse = self.allocate_entity_id();
        let victim = self.dungeon_mut().expect_mob_mut(mob)?;
        let remains = victim.die(corpse);
        let (name, location) = (victim.name().to_string(), victim.location());

        for item in remains {
            self.dungeon_mut().add_item(item)?;
        }
        self.narrate(format!("{name} dies."));
        self.pending_events.push(GameEvent::Died { id: mob, name, location });
        Ok(())
    }

    fn drop_item(&mut self, actor: EntityId, item: EntityId) -> Performed {
        let dropped = match self.dungeon_mut().expect_mob_mut(actor)?.take_item(item) {
            Ok(dropped) => dropped,
            Err(failure) => return Ok(Err(failure)),
        };
        self.put_down(actor, vec![dropped])?;
        Ok(Ok(()))
    }

    fn drop_all(&mut self, actor: EntityId) -> Performed {
        let items = self.dungeon_mut().expect_mob_mut(actor)?.take_all();
        self.put_down(actor, items)?;
        Ok(Ok(()))
    }

    fn put_down(&mut self, actor: EntityId, items: Vec<Item>) -> Result<(), InvariantError> {
        let ids: Vec<EntityId> = items.iter().map(Item::id).collect();
        for item in items {
            if actor.is_player() {
                self.narrate(format!("You drop {}.", item.name()));
            }
            self.dungeon_mut().add_item(item)?;
        }
        self.pending_events.push(GameEvent::Dropped { mob: actor, items: ids });
        Ok(())
    }

    fn pick_up_all(&mut self, actor: EntityId) -> Performed {
        let location = self.dungeon().expect_mob(actor)?.location();
        let items = self.dungeon_mut().take_items(location);
        if items.is_empty() {
            return Ok(Err(ActionFailure::NothingToPickUp { location }));
        }

        let ids: Vec<EntityId> = items.iter().map(Item::id).collect();
        let names: Vec<String> = items.iter().map(|item| item.name().to_string()).collect();
        let picker = self.dungeon_mut().expect_mob_mut(actor)?;
        let picker_name = picker.name().to_string();
        for item in items {
            picker.pick_up(item);
        }

        for name in names {
            if actor.is_player() {
                self.narrate(format!("You pick up {name}."));
            } else {
                self.narrate(format!("{picker_name} picks up {name}."));
            }
        }
        self.pending_events.push(GameEvent::PickedUp { mob: actor, items: ids });
        Ok(Ok(()))
    }
}
