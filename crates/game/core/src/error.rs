//! Common error infrastructure for lumen-core.
//!
//! Two classes of failure exist and they never mix:
//!
//! - [`InvariantError`]: the core detected a bug in itself or its caller
//!   (two actors on one cell, deleting something that is not there, ticking
//!   out of turn order, an unmapped state transition). These are fatal. The
//!   core never panics on them; it returns them so the owning shell can log
//!   full context, release its resources, and stop.
//! - [`ActionFailure`]: an ordinary game-flow outcome (a wall in the way,
//!   nothing to pick up). The engine narrates these and carries on.

use crate::engine::{GameState, Trigger};
use crate::entity::EntityId;
use crate::geometry::Vector;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative action.
    ///
    /// Examples: destination blocked, nothing to pick up
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: dropping an item that is not carried
    Validation,

    /// Unexpected state inconsistency between the occupancy map and entities.
    ///
    /// Examples: deleting an entity missing from its recorded cell
    Internal,

    /// Game state can no longer be trusted.
    ///
    /// Examples: two actors on one cell, out-of-order tick, unmapped state
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }

    /// Returns true if this error indicates a bug in the core.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Entity that triggered the error (if applicable).
    pub entity: Option<EntityId>,

    /// Location where the error occurred (if applicable).
    pub location: Option<Vector>,

    /// Turn number the error refers to (if applicable).
    pub turn: Option<u64>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entity: None,
            location: None,
            turn: None,
        }
    }

    #[must_use]
    pub const fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    #[must_use]
    pub const fn with_location(mut self, location: Vector) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub const fn with_turn(mut self, turn: u64) -> Self {
        self.turn = Some(turn);
        self
    }
}

/// Common trait for all lumen-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Diagnostic context, if the error carries any.
    fn context(&self) -> Option<ErrorContext> {
        None
    }

    /// Static identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Fatal breach of a core invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("tried to put two mobs on {location}: {incoming} onto {existing}")]
    DuplicateMob {
        location: Vector,
        existing: EntityId,
        incoming: EntityId,
    },

    #[error("tried to put two features on {location}: {incoming} onto {existing}")]
    DuplicateFeature {
        location: Vector,
        existing: EntityId,
        incoming: EntityId,
    },

    #[error("tried to place {entity} outside the dungeon at {location}")]
    OutOfBounds { entity: EntityId, location: Vector },

    #[error("tried to delete mob {mob} not present at {location}")]
    MissingMob { mob: EntityId, location: Vector },

    #[error("tried to delete feature {feature} not present at {location}")]
    MissingFeature { feature: EntityId, location: Vector },

    #[error("tried to delete item {item} not present at {location}")]
    MissingItem { item: EntityId, location: Vector },

    #[error("mob {mob} is not in the current dungeon")]
    UnknownMob { mob: EntityId },

    #[error(
        "mob {mob} ticked out of order on turn {turn}: last ticked {actual_last}, expected {expected_last}"
    )]
    TickOutOfOrder {
        mob: EntityId,
        turn: u64,
        expected_last: u64,
        actual_last: u64,
    },

    #[error("no transition from {state} on {trigger}")]
    InvalidTransition { state: GameState, trigger: Trigger },

    #[error("dungeon index {index} out of range ({count} dungeons)")]
    UnknownDungeon { index: usize, count: usize },
}

impl GameError for InvariantError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingMob { .. }
            | Self::MissingFeature { .. }
            | Self::MissingItem { .. }
            | Self::UnknownMob { .. } => ErrorSeverity::Internal,
            Self::DuplicateMob { .. }
            | Self::DuplicateFeature { .. }
            | Self::OutOfBounds { .. }
            | Self::TickOutOfOrder { .. }
            | Self::InvalidTransition { .. }
            | Self::UnknownDungeon { .. } => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        let context = ErrorContext::new();
        let context = match *self {
            Self::DuplicateMob {
                location, incoming, ..
            }
            | Self::DuplicateFeature {
                location, incoming, ..
            } => context.with_entity(incoming).with_location(location),
            Self::OutOfBounds { entity, location } => {
                context.with_entity(entity).with_location(location)
            }
            Self::MissingMob { mob, location } => context.with_entity(mob).with_location(location),
            Self::MissingFeature { feature, location } => {
                context.with_entity(feature).with_location(location)
            }
            Self::MissingItem { item, location } => {
                context.with_entity(item).with_location(location)
            }
            Self::UnknownMob { mob } => context.with_entity(mob),
            Self::TickOutOfOrder { mob, turn, .. } => context.with_entity(mob).with_turn(turn),
            Self::InvalidTransition { .. } | Self::UnknownDungeon { .. } => return None,
        };
        Some(context)
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateMob { .. } => "DUPLICATE_MOB",
            Self::DuplicateFeature { .. } => "DUPLICATE_FEATURE",
            Self::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            Self::MissingMob { .. } => "MISSING_MOB",
            Self::MissingFeature { .. } => "MISSING_FEATURE",
            Self::MissingItem { .. } => "MISSING_ITEM",
            Self::UnknownMob { .. } => "UNKNOWN_MOB",
            Self::TickOutOfOrder { .. } => "TICK_OUT_OF_ORDER",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::UnknownDungeon { .. } => "UNKNOWN_DUNGEON",
        }
    }
}

/// Expected, non-fatal reasons an action did not happen.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionFailure {
    #[error("destination {destination} is blocked")]
    Blocked { destination: Vector },

    #[error("nothing to pick up at {location}")]
    NothingToPickUp { location: Vector },

    #[error("target {target} is already dead")]
    TargetAlreadyDead { target: EntityId },

    #[error("target {target} is not hostile")]
    NotHostile { target: EntityId },

    #[error("item {item} is not in the inventory")]
    NotInInventory { item: EntityId },
}

impl GameError for ActionFailure {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotInInventory { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        let context = ErrorContext::new();
        Some(match *self {
            Self::Blocked { destination } => context.with_location(destination),
            Self::NothingToPickUp { location } => context.with_location(location),
            Self::TargetAlreadyDead { target } | Self::NotHostile { target } => {
                context.with_entity(target)
            }
            Self::NotInInventory { item } => context.with_entity(item),
        })
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Blocked { .. } => "BLOCKED",
            Self::NothingToPickUp { .. } => "NOTHING_TO_PICK_UP",
            Self::TargetAlreadyDead { .. } => "TARGET_ALREADY_DEAD",
            Self::NotHostile { .. } => "NOT_HOSTILE",
            Self::NotInInventory { .. } => "NOT_IN_INVENTORY",
        }
    }
}
