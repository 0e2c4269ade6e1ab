//! # werewolf-engine
//!
//! A turn-based social-deduction ("Werewolf") game engine: role
//! assignment, per-role night-action intake, a deterministic
//! night-resolution pipeline, day voting with lynch resolution, and
//! win-condition evaluation.
//!
//! ## Design Principles
//!
//! 1. **Engine, not bot**: no transport, no formatting, no timers. A chat
//!    frontend (or a test) drives the engine through the methods on
//!    [`Game`] and turns the typed results into messages. The engine
//!    accepts only already-authorized actor ids.
//!
//! 2. **Check, then commit**: every call validates fully before touching
//!    state. A rejected call returns a [`GameError`] and mutates nothing.
//!
//! 3. **Deterministic**: all randomness (the deal, wolf-vote tie breaks)
//!    comes from one seeded stream, so whole games replay from a seed.
//!
//! 4. **Serialized access**: methods take `&mut self` and never block.
//!    One game per chat, one mutex per game; exclusive access gives the
//!    phase-advancing calls their at-most-once, consistent-snapshot
//!    semantics for free.
//!
//! ## Modules
//!
//! - `core`: player identity and registry, deterministic RNG, errors
//! - `roles`: the role catalog and its capability table
//! - `effects`: one-shot scheduled effects (silence, binding, delayed
//!   deaths, kill suppression)
//! - `game`: the `Game` aggregate - assignment, night, day, win

pub mod core;
pub mod effects;
pub mod game;
pub mod roles;

// Re-export commonly used types
pub use crate::core::{GameError, GameRng, GameRngState, Player, PlayerId, Roster};

pub use crate::roles::{Alignment, Role};

pub use crate::effects::{EffectKind, EffectLedger};

pub use crate::game::{
    Ballot, DayOutcome, Death, DeathCause, EventRecord, Game, GameConfig, GameEvent, NamedPlayer,
    NightSummary, Phase, Verdict, Visions, Winner,
};
