//! Error taxonomy for engine calls.
//!
//! Every fallible operation returns `Result<_, GameError>`. Errors are
//! local and recoverable: a rejected call makes no mutation, so the game
//! can never be left half-updated by bad input. The `Display` strings are
//! terse defaults; transports are expected to produce their own
//! player-facing text from the variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an engine call was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    /// The operation is not valid in the current phase.
    #[error("not allowed in the current phase")]
    WrongPhase,

    /// The actor is dead, unknown, or does not hold the required role.
    #[error("actor is dead or lacks the required role")]
    RoleMismatch,

    /// The target does not exist, or is not alive where aliveness is
    /// required.
    #[error("no such target, or target is not alive")]
    InvalidTarget,

    /// A one-time resource (witch potion) has already been spent.
    #[error("that ability has already been used")]
    ResourceExhausted,

    /// The bodyguard may not protect the same player two nights running.
    #[error("cannot protect the same player two nights in a row")]
    RepeatTarget,

    /// The actor is bound (cannot act tonight) or silenced (cannot vote
    /// today).
    #[error("actor is bound or silenced")]
    Bound,

    /// Fewer players than the configured minimum.
    #[error("not enough players to start")]
    NotEnoughPlayers,

    /// The game has already left the lobby.
    #[error("the game has already started")]
    AlreadyStarted,

    /// The player is already registered in this game.
    #[error("already joined this game")]
    AlreadyJoined,

    /// Free-text name lookup matched more than one living player.
    #[error("name matches more than one player")]
    Ambiguous,
}
