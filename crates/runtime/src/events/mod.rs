//! Event distribution for runtime consumers.
mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{GameStateEvent, NarrationEvent};
