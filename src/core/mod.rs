//! Core building blocks: player identity and registry, deterministic RNG,
//! and the error taxonomy.
//!
//! Everything here is independent of werewolf rules; the rules live in
//! `crate::game`.

pub mod error;
pub mod player;
pub mod rng;

pub use error::GameError;
pub use player::{Player, PlayerId, Roster};
pub use rng::{GameRng, GameRngState};
