//! Event payloads published by the simulation worker.
use lumen_core::{GameEvent, GameState, Message};

/// A narrated line, as appended to the game's message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationEvent {
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStateEvent {
    /// One legal step of the state machine was taken.
    StepResolved {
        state: GameState,
        turn: u64,
        events: Vec<GameEvent>,
    },
    /// The game reached its terminal state.
    Closed { turn: u64 },
    /// The core reported a broken invariant; the worker has stopped.
    Fault { error: String },
}
