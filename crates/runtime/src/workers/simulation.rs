//! Simulation worker that owns the authoritative [`lumen_core::Game`].
//!
//! Receives commands from [`crate::RuntimeHandle`], advances the state
//! machine, and publishes narration and state events. A broken core
//! invariant is logged, broadcast as a fault, and stops the worker.
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use lumen_core::{Game, GameError, GameState, InvariantError, MobAction, StepOutcome};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, GameStateEvent, NarrationEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Advance the state machine by exactly one legal step.
    Step {
        action: MobAction,
        reply: oneshot::Sender<Result<StepOutcome>>,
    },
    /// Perform the player's action and resolve the world turn it triggers.
    Play {
        action: MobAction,
        reply: oneshot::Sender<Result<StepOutcome>>,
    },
    /// Read-only copy of the whole game.
    QueryGame { reply: oneshot::Sender<Game> },
    /// Move the game to its terminal state.
    Close { reply: oneshot::Sender<GameState> },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    game: Game,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(game: Game, command_rx: mpsc::Receiver<Command>, event_bus: EventBus) -> Self {
        Self {
            game,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends when every handle is dropped or the core
    /// reports a broken invariant.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            if !self.handle_command(command) {
                break;
            }
        }
        debug!(target: "lumen::worker", turn = self.game.turn(), "simulation worker stopped");
    }

    /// Returns false once the worker must stop.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Step { action, reply } => {
                let result = self.advance(action, Game::step);
                let healthy = !matches!(result, Err(RuntimeError::Invariant(_)));
                let _ = reply.send(result);
                healthy
            }
            Command::Play { action, reply } => {
                let result = self.advance(action, Game::play);
                let healthy = !matches!(result, Err(RuntimeError::Invariant(_)));
                let _ = reply.send(result);
                healthy
            }
            Command::QueryGame { reply } => {
                let _ = reply.send(self.game.clone());
                true
            }
            Command::Close { reply } => {
                let was_closed = self.game.is_closed();
                self.game.close();
                if !was_closed {
                    self.publish_closed();
                }
                let _ = reply.send(self.game.state());
                true
            }
        }
    }

    fn advance<F>(&mut self, action: MobAction, drive: F) -> Result<StepOutcome>
    where
        F: FnOnce(&mut Game, MobAction) -> std::result::Result<StepOutcome, InvariantError>,
    {
        let was_closed = self.game.is_closed();
        match drive(&mut self.game, action) {
            Ok(outcome) => {
                self.publish(&outcome);
                if outcome.state.is_closed() && !was_closed {
                    self.publish_closed();
                }
                Ok(outcome)
            }
            Err(invariant) => {
                error!(
                    target: "lumen::worker",
                    code = invariant.error_code(),
                    severity = invariant.severity().as_str(),
                    context = ?invariant.context(),
                    error = %invariant,
                    %action,
                    "core invariant broken, stopping simulation"
                );
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::Fault {
                        error: invariant.to_string(),
                    }));
                Err(invariant.into())
            }
        }
    }

    fn publish(&self, outcome: &StepOutcome) {
        for message in &outcome.messages {
            self.event_bus.publish(Event::Narration(NarrationEvent {
                message: message.clone(),
            }));
        }
        self.event_bus
            .publish(Event::GameState(GameStateEvent::StepResolved {
                state: outcome.state,
                turn: outcome.turn,
                events: outcome.events.clone(),
            }));
    }

    fn publish_closed(&self) {
        self.event_bus
            .publish(Event::GameState(GameStateEvent::Closed {
                turn: self.game.turn(),
            }));
    }
}
