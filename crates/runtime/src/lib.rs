//! Async shell around the lumen simulation core.
//!
//! The core is synchronous and pure; this crate owns a [`lumen_core::Game`]
//! inside a background tokio task and lets clients drive it through a
//! cloneable [`RuntimeHandle`]. Narrated messages and state changes are
//! broadcast on an [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event routing
//! - [`config`] loads layered runtime configuration
//! - [`scenario`] generates the starting level
//! - [`logging`] installs the tracing subscriber
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod logging;
pub mod runtime;
pub mod scenario;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use config::{LevelConfig, LoggingConfig, PlayerConfig, RuntimeConfig};
pub use events::{Event, EventBus, GameStateEvent, NarrationEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder};
