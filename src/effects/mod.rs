//! One-shot scheduled effects.
//!
//! Several night and day mechanics schedule something that fires at a
//! well-defined later step and then disappears: a silenced player skips
//! the next day's vote, a bound player skips the next night's action, a
//! Tough Guy carries a pending death to their next lethal hit, and a
//! Diseased kill (or, by configuration, a lynched Wolf Cub) suppresses
//! the wolves' next kill. Instead of a scatter of bespoke booleans, these
//! all live in one ledger of `(kind, player)` entries that the resolution
//! pipeline schedules, checks, and consumes at fixed steps - which keeps
//! the ordering auditable and testable in isolation.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// The kinds of one-shot effect the engine schedules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// May not vote during the coming day (Old Hag).
    SilencedToday,
    /// May not submit any night action tonight (Spellcaster).
    BoundTonight,
    /// Tough Guy already absorbed a hit; the next lethal hit kills.
    PendingDeath,
    /// The wolves' next kill vote is discarded (Diseased, Wolf Cub).
    /// Global: not keyed to a player.
    SkipWolfKill,
}

/// The set of currently scheduled effects.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EffectLedger {
    entries: FxHashSet<(EffectKind, Option<PlayerId>)>,
}

impl EffectLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an effect on a player.
    pub fn schedule(&mut self, kind: EffectKind, player: PlayerId) {
        self.entries.insert((kind, Some(player)));
    }

    /// Schedule a global effect.
    pub fn schedule_global(&mut self, kind: EffectKind) {
        self.entries.insert((kind, None));
    }

    /// Whether an effect is scheduled on a player.
    #[must_use]
    pub fn scheduled(&self, kind: EffectKind, player: PlayerId) -> bool {
        self.entries.contains(&(kind, Some(player)))
    }

    /// Whether a global effect is scheduled.
    #[must_use]
    pub fn scheduled_global(&self, kind: EffectKind) -> bool {
        self.entries.contains(&(kind, None))
    }

    /// Remove an effect from a player, reporting whether it was present.
    pub fn consume(&mut self, kind: EffectKind, player: PlayerId) -> bool {
        self.entries.remove(&(kind, Some(player)))
    }

    /// Remove a global effect, reporting whether it was present.
    pub fn take_global(&mut self, kind: EffectKind) -> bool {
        self.entries.remove(&(kind, None))
    }

    /// Drop every entry of one kind.
    pub fn clear_kind(&mut self, kind: EffectKind) {
        self.entries.retain(|(k, _)| *k != kind);
    }

    /// Drop everything. Used when a new game is dealt.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Players currently under an effect kind.
    pub fn players(&self, kind: EffectKind) -> impl Iterator<Item = PlayerId> + '_ {
        self.entries
            .iter()
            .filter(move |(k, _)| *k == kind)
            .filter_map(|(_, p)| *p)
    }
}
