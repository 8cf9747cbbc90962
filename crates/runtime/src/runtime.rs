//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command and event
//! channels, and exposes a builder-based API for clients to drive the game.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use lumen_core::Game;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::scenario;
use crate::workers::{Command, SimulationWorker};

/// Main runtime that owns the game loop task.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Waits for the worker once every handle has been dropped.
    ///
    /// Clones handed out through [`Runtime::handle`] keep the worker alive;
    /// drop them first or this waits forever.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!(target: "lumen::runtime", "runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    game: Option<Game>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            game: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Run an existing game instead of generating one from the config.
    pub fn game(mut self, game: Game) -> Self {
        self.game = Some(game);
        self
    }

    /// Spawns the simulation worker. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let game = match self.game {
            Some(game) => game,
            None => scenario::build_game(&self.config)?,
        };

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size.max(1));

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());
        let sim_worker = SimulationWorker::new(game, command_rx, event_bus);

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        info!(target: "lumen::runtime", seed = self.config.seed, "runtime started");
        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
