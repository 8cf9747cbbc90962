//! Monster decision logic.
//!
//! A monster looks around with its own field of view, locks onto the nearest
//! enemy (or failing that the nearest loose item) and heads for it. With
//! nothing in sight it shuffles in a random direction.
use rand::Rng;
use tracing::debug;

use crate::action::MobAction;
use crate::dungeon::Dungeon;
use crate::entity::EntityId;
use crate::geometry::Vector;
use crate::rng::turn_rng;

use super::Mob;

/// What a monster is currently pursuing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Focus {
    Enemy { id: EntityId, location: Vector },
    Item { id: EntityId, location: Vector },
}

impl Focus {
    pub fn location(&self) -> Vector {
        match self {
            Focus::Enemy { location, .. } | Focus::Item { location, .. } => *location,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Focus::Enemy { id, .. } | Focus::Item { id, .. } => *id,
        }
    }
}

/// A decision: the focus to remember and the action to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub focus: Option<Focus>,
    pub action: MobAction,
}

/// Picks the focus for `mob` from what it can currently see.
///
/// Enemies win over items. Items only count where the mob can step, or
/// where it already stands. Among candidates of the same kind the nearest by
/// Chebyshev distance wins, ties broken by row then column.
pub fn find_focus(mob: &Mob, dungeon: &Dungeon) -> Option<Focus> {
    let origin = mob.location();
    let mut enemy: Option<(i32, (i32, i32), Focus)> = None;
    let mut item: Option<(i32, (i32, i32), Focus)> = None;

    dungeon.on_tiles_in_line_of_sight(origin, mob.vision_radius(), |location, _| {
        let group = dungeon.feature_group(location);
        let rank = (origin.distance_to(location), (location.y, location.x));

        if let Some(other) = group.actor() {
            if other.id() != mob.id() && !other.dead() && mob.is_hostile_to(other) {
                keep_nearest(
                    &mut enemy,
                    rank,
                    Focus::Enemy {
                        id: other.id(),
                        location,
                    },
                );
            }
        }
        // a pile under a corpse cannot be reached
        let reachable = location == origin || group.crossable();
        let loose = group.items().iter().find(|loose| loose.crossable());
        if let Some(loose) = loose.filter(|_| reachable) {
            keep_nearest(
                &mut item,
                rank,
                Focus::Item {
                    id: loose.id(),
                    location,
                },
            );
        }
    });

    enemy.or(item).map(|(_, _, focus)| focus)
}

fn keep_nearest(
    best: &mut Option<(i32, (i32, i32), Focus)>,
    (distance, order): (i32, (i32, i32)),
    candidate: Focus,
) {
    let closer = best.as_ref().is_none_or(|(best_distance, best_order, _)| {
        (distance, order) < (*best_distance, *best_order)
    });
    if closer {
        *best = Some((distance, order, candidate));
    }
}

/// Decides what `mob` does on `turn`. The player never decides here.
pub fn decide(mob: &Mob, dungeon: &Dungeon, turn: u64, game_seed: u64) -> Decision {
    if mob.is_player() {
        return Decision {
            focus: None,
            action: MobAction::None,
        };
    }

    let focus = find_focus(mob, dungeon);
    let origin = mob.location();
    let action = match focus {
        // adjacent enemies are attacked by moving into them
        Some(Focus::Enemy { location, .. }) => MobAction::Move(origin.step_toward(location)),
        Some(Focus::Item { location, .. }) if location == origin => MobAction::PickUpAll,
        Some(Focus::Item { location, .. }) => MobAction::Move(origin.step_toward(location)),
        None => wander(mob.id(), turn, game_seed),
    };

    debug!(
        target: "lumen::ai",
        mob = %mob.id(),
        turn,
        focus = ?focus,
        action = ?action,
        "mob decided"
    );

    Decision { focus, action }
}

/// One of the nine cells around the mob, the centre meaning stand still.
fn wander(mob: EntityId, turn: u64, game_seed: u64) -> MobAction {
    let roll: i32 = turn_rng(game_seed, turn, mob).gen_range(0..9);
    let direction = Vector::new(roll % 3 - 1, roll / 3 - 1);
    if direction.is_zero() {
        MobAction::None
    } else {
        MobAction::Move(direction)
    }
}
