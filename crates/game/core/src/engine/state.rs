//! Whose turn it is, and the table of legal moves between turns.
use crate::error::InvariantError;

/// Top-level phase of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    /// Waiting for the player's action.
    #[default]
    PlayerTurn,
    /// Every other actor acts, then the view is recomputed.
    WorldTurn,
    /// Terminal. No further input is accepted.
    Closed,
}

/// Events that move the game between states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Trigger {
    /// The player did something that used up the turn.
    PlayerActed,
    /// All actors acted and the view was refreshed.
    WorldResolved,
    PlayerDied,
    Close,
}

impl GameState {
    /// Looks up the successor state. Pairs missing from the table are fatal.
    pub fn next(self, trigger: Trigger) -> Result<GameState, InvariantError> {
        use GameState::*;
        use Trigger::*;

        match (self, trigger) {
            (PlayerTurn, PlayerActed) => Ok(WorldTurn),
            (WorldTurn, WorldResolved) => Ok(PlayerTurn),
            (PlayerTurn | WorldTurn, PlayerDied | Close) => Ok(Closed),
            (state, trigger) => Err(InvariantError::InvalidTransition { state, trigger }),
        }
    }

    pub fn is_closed(self) -> bool {
        self == GameState::Closed
    }
}
