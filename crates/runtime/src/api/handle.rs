//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the simulation, reading its state, or streaming events.
use tokio::sync::{broadcast, mpsc, oneshot};

use lumen_core::{Game, GameState, MobAction, StepOutcome};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the state machine by exactly one legal step.
    pub async fn step(&self, action: MobAction) -> Result<StepOutcome> {
        self.request(|reply| Command::Step { action, reply }).await?
    }

    /// Perform a player action and resolve the world turn it triggers.
    pub async fn play(&self, action: MobAction) -> Result<StepOutcome> {
        self.request(|reply| Command::Play { action, reply }).await?
    }

    /// Read-only snapshot of the running game.
    pub async fn query_game(&self) -> Result<Game> {
        self.request(|reply| Command::QueryGame { reply }).await
    }

    /// End the game. Returns the resulting state, always `Closed`.
    pub async fn close(&self) -> Result<GameState> {
        self.request(|reply| Command::Close { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use lumen_runtime::{Event, Topic};
    ///
    /// let mut narration = handle.subscribe(Topic::Narration);
    /// while let Ok(Event::Narration(line)) = narration.recv().await {
    ///     println!("{}", line.message);
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
