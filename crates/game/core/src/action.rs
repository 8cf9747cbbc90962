//! Intents fed into the turn engine.
use std::fmt;

use crate::entity::EntityId;
use crate::geometry::Vector;

/// The single channel through which the input layer and monster AI request
/// something of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MobAction {
    /// Do nothing and leave the turn unconsumed.
    #[default]
    None,
    /// Pass the turn.
    Wait,
    /// Step by a delta, attacking whatever hostile actor stands there.
    Move(Vector),
    /// Drop one carried item.
    Drop(EntityId),
    /// Drop everything carried.
    DropAll,
    /// Pick up every item on the actor's cell.
    PickUpAll,
}

impl MobAction {
    /// Convenience for the eight compass moves.
    pub fn step(direction: Vector) -> Self {
        Self::Move(direction.unit())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for MobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Wait => f.write_str("wait"),
            Self::Move(delta) => write!(f, "move {delta}"),
            Self::Drop(item) => write!(f, "drop {item}"),
            Self::DropAll => f.write_str("drop all"),
            Self::PickUpAll => f.write_str("pick up all"),
        }
    }
}
