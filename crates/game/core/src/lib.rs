//! Simulation core of the Lumen roguelike.
//!
//! `lumen-core` holds the dungeon model, the shadowcasting lighting and
//! visibility engine, and the turn-resolution state machine. It is pure and
//! synchronous: the runtime feeds it [`MobAction`]s and reads back tiles,
//! occupancy, and narrated messages. All state mutation flows through
//! [`engine::Game`].
pub mod action;
pub mod actor;
pub mod config;
pub mod dungeon;
pub mod engine;
pub mod entity;
pub mod error;
pub mod feature_group;
pub mod fov;
pub mod geometry;
pub mod rng;
pub mod tile;

pub use action::MobAction;
pub use actor::{Faction, Focus, Hit, Mob, MobKind};
pub use config::GameConfig;
pub use dungeon::Dungeon;
pub use engine::{Game, GameEvent, GameState, Message, MessageLog, StepOutcome, Trigger};
pub use entity::{Appearance, EntityId, Feature, Item, ItemKind, Occupant};
pub use error::{ActionFailure, ErrorContext, ErrorSeverity, GameError, InvariantError};
pub use feature_group::FeatureGroup;
pub use fov::{FieldOfView, Opacity};
pub use geometry::{Rect, Vector};
pub use rng::turn_rng;
pub use tile::{Color, Flag, Tile};
