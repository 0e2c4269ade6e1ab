//! Append-only game history.
//!
//! Every externally observable mutation leaves a record: joins, the deal,
//! deaths with their cause, conversions, recruitments, reveals, and the
//! final result. The transport reads the log for end-of-game recaps; the
//! engine itself never consults it.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::roles::Role;

use super::win::Winner;
use super::Phase;

/// How a player died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    WolfKill,
    Poison,
    Bite,
    Grief,
    Lynch,
}

/// One observable state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Joined { player: PlayerId },
    RolesAssigned { players: usize },
    Died { player: PlayerId, cause: DeathCause },
    /// A player's role changed without a death (Cursed turning wolf, a
    /// bitten villager turning vampire).
    Converted { player: PlayerId, role: Role },
    Recruited { player: PlayerId },
    Paired { first: PlayerId, second: PlayerId },
    PrinceRevealed { player: PlayerId },
    MayorRevealed { player: PlayerId },
    Ended { winner: Winner },
}

/// An event stamped with when it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub day: u32,
    pub phase: Phase,
    pub event: GameEvent,
}
