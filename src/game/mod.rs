//! The game aggregate: one werewolf session from lobby to a winner.
//!
//! `Game` owns the player registry, the phase machine, the transient
//! per-night intents and per-day ballots, and the small set of modifiers
//! that outlive a single night (potion availability, the bodyguard's last
//! pick, the lovers pair, reveal sets, scheduled one-shot effects).
//!
//! ## Driving it
//!
//! A transport layer (chat bot, test harness) calls:
//! - `add_player` while in the lobby, then `assign_roles` once;
//! - the per-role intake setters during each night, then `resolve_night`;
//! - `vote` / `reveal_mayor` during each day, then `end_day`.
//!
//! Phase-advancing calls are guarded by the phase itself, so a duplicate
//! `resolve_night` or `end_day` is rejected with `WrongPhase` rather than
//! resolving twice.
//!
//! ## Concurrency
//!
//! Every mutating call takes `&mut self` and returns without blocking.
//! The engine holds no process-wide state and does no locking; wrap each
//! game in its own mutex and the at-most-once and consistent-snapshot
//! requirements fall out of exclusive access.

mod assign;
mod day;
mod event;
mod night;
mod win;

pub use day::{Ballot, DayOutcome, Verdict};
pub use event::{DeathCause, EventRecord, GameEvent};
pub use night::{Death, NamedPlayer, NightSummary, Visions};
pub use win::Winner;

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{GameError, GameRng, GameRngState, PlayerId, Roster};
use crate::effects::EffectLedger;
use crate::roles::Role;

use night::NightIntents;

/// Where a game is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    Night,
    Day,
    Over,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Lobby => "lobby",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Over => "over",
        })
    }
}

/// Engine configuration.
///
/// ```
/// use werewolf_engine::game::GameConfig;
///
/// let config = GameConfig::new().min_players(7).wolf_cub_suppresses_kill(false);
/// assert_eq!(config.min_players, 7);
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Fewest players `assign_roles` accepts.
    pub min_players: usize,
    /// Whether lynching a Wolf Cub suppresses the wolves' next kill, the
    /// way a Diseased kill does. Host policy; the sources disagree.
    pub wolf_cub_suppresses_kill: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 5,
            wolf_cub_suppresses_kill: true,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise (or lower) the minimum player count.
    #[must_use]
    pub fn min_players(mut self, min: usize) -> Self {
        self.min_players = min;
        self
    }

    /// Set the Wolf Cub lynch policy.
    #[must_use]
    pub fn wolf_cub_suppresses_kill(mut self, on: bool) -> Self {
        self.wolf_cub_suppresses_kill = on;
        self
    }
}

/// One werewolf session.
pub struct Game {
    config: GameConfig,
    rng: GameRng,
    roster: Roster,
    phase: Phase,
    day_count: u32,

    // Team membership can outgrow role alignment (recruits, conversions),
    // so it is tracked as sets rather than derived from roles.
    wolves: FxHashSet<PlayerId>,
    vampires: FxHashSet<PlayerId>,
    cult: FxHashSet<PlayerId>,
    masons: FxHashSet<PlayerId>,

    night: NightIntents,
    votes: FxHashMap<PlayerId, Ballot>,

    effects: EffectLedger,
    heal_available: bool,
    poison_available: bool,
    last_protected: Option<PlayerId>,
    lovers: Option<(PlayerId, PlayerId)>,
    revealed_mayors: FxHashSet<PlayerId>,
    revealed_princes: FxHashSet<PlayerId>,

    winner: Option<Winner>,
    history: Vector<EventRecord>,
}

impl Game {
    /// Create a lobby with the default configuration.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(GameConfig::default(), seed)
    }

    /// Create a lobby with an explicit configuration.
    #[must_use]
    pub fn with_config(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: GameRng::new(seed),
            roster: Roster::new(),
            phase: Phase::Lobby,
            day_count: 0,
            wolves: FxHashSet::default(),
            vampires: FxHashSet::default(),
            cult: FxHashSet::default(),
            masons: FxHashSet::default(),
            night: NightIntents::default(),
            votes: FxHashMap::default(),
            effects: EffectLedger::new(),
            heal_available: true,
            poison_available: true,
            last_protected: None,
            lovers: None,
            revealed_mayors: FxHashSet::default(),
            revealed_princes: FxHashSet::default(),
            winner: None,
            history: Vector::new(),
        }
    }

    /// Register a player. Lobby only; ids must be unique.
    pub fn add_player(&mut self, id: PlayerId, name: impl Into<String>) -> Result<(), GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        self.roster.add(id, name)?;
        self.record(GameEvent::Joined { player: id });
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Days completed so far; increments on each night→day transition.
    #[must_use]
    pub fn day_count(&self) -> u32 {
        self.day_count
    }

    /// The winning side, once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The full registry, dead players included.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        self.roster.role(id)
    }

    #[must_use]
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.roster.is_alive(id)
    }

    /// Resolve a 1-based number over the alphabetical alive list.
    #[must_use]
    pub fn player_by_number(&self, number: usize) -> Option<PlayerId> {
        self.roster.by_number(number)
    }

    /// Resolve free text against living players' names.
    pub fn resolve_name(&self, query: &str) -> Result<PlayerId, GameError> {
        self.roster.resolve_name(query)
    }

    /// Wolf-team members (the transport's night-channel audience).
    #[must_use]
    pub fn wolves(&self) -> &FxHashSet<PlayerId> {
        &self.wolves
    }

    #[must_use]
    pub fn vampires(&self) -> &FxHashSet<PlayerId> {
        &self.vampires
    }

    #[must_use]
    pub fn cult(&self) -> &FxHashSet<PlayerId> {
        &self.cult
    }

    #[must_use]
    pub fn masons(&self) -> &FxHashSet<PlayerId> {
        &self.masons
    }

    #[must_use]
    pub fn lovers(&self) -> Option<(PlayerId, PlayerId)> {
        self.lovers
    }

    /// The append-only event log.
    #[must_use]
    pub fn history(&self) -> &Vector<EventRecord> {
        &self.history
    }

    /// RNG state, for checkpointing alongside the rest of the game.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Run the win evaluator against the current state without mutating.
    #[must_use]
    pub fn evaluate_winner(&self) -> Option<Winner> {
        win::evaluate(&self.roster, &self.wolves, &self.vampires, &self.cult, self.lovers)
    }

    // === Internals shared by the resolution paths ===

    pub(crate) fn record(&mut self, event: GameEvent) {
        self.history.push_back(EventRecord {
            day: self.day_count,
            phase: self.phase,
            event,
        });
    }

    /// Mark a player dead and log it. False if already dead or unknown.
    pub(crate) fn kill(&mut self, id: PlayerId, cause: DeathCause) -> bool {
        if self.roster.kill(id) {
            self.record(GameEvent::Died { player: id, cause });
            true
        } else {
            false
        }
    }

    /// Consult the evaluator and end the game if a side has won.
    pub(crate) fn check_winner(&mut self) {
        if self.phase == Phase::Over {
            return;
        }
        if let Some(winner) = self.evaluate_winner() {
            self.winner = Some(winner);
            self.phase = Phase::Over;
            self.record(GameEvent::Ended { winner });
            tracing::debug!(?winner, "game over");
        }
    }

    /// Add role-derived team membership (assignment, conversions, swaps).
    pub(crate) fn enroll_role_teams(&mut self, id: PlayerId, role: Role) {
        if role.is_wolf_team() {
            self.wolves.insert(id);
        }
        match role {
            Role::Vampire => {
                self.vampires.insert(id);
            }
            Role::Mason => {
                self.masons.insert(id);
            }
            Role::CultLeader => {
                self.cult.insert(id);
            }
            _ => {}
        }
    }

    /// Remove role-derived membership; recruit-gained membership stays.
    pub(crate) fn retire_role_teams(&mut self, id: PlayerId, role: Role) {
        if role.is_wolf_team() {
            self.wolves.remove(&id);
        }
        match role {
            Role::Vampire => {
                self.vampires.remove(&id);
            }
            Role::Mason => {
                self.masons.remove(&id);
            }
            Role::CultLeader => {
                self.cult.remove(&id);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_player_lobby_only() {
        let mut game = Game::new(1);
        game.add_player(PlayerId::new(1), "Ana").unwrap();
        assert_eq!(
            game.add_player(PlayerId::new(1), "Ana"),
            Err(GameError::AlreadyJoined)
        );
        for i in 2..=5 {
            game.add_player(PlayerId::new(i), format!("p{i}")).unwrap();
        }
        game.assign_roles(&[Role::Werewolf]).unwrap();
        assert_eq!(
            game.add_player(PlayerId::new(9), "late"),
            Err(GameError::AlreadyStarted)
        );
    }

    #[test]
    fn test_join_is_logged() {
        let mut game = Game::new(1);
        game.add_player(PlayerId::new(4), "Ana").unwrap();
        assert!(game.history().iter().any(|r| matches!(
            r.event,
            GameEvent::Joined { player } if player == PlayerId::new(4)
        )));
    }
}
