//! Player identity and the per-game player registry.
//!
//! ## PlayerId
//!
//! Type-safe wrapper over the transport's participant id (a chat user id).
//! The engine never interprets the value.
//!
//! ## Roster
//!
//! Insertion-ordered registry of everyone who ever joined the game. Dead
//! players stay in the roster with `alive == false`; entries are never
//! removed. The roster also answers the two lookup styles chat UIs need:
//! a 1-based number over the alphabetically-sorted alive list, and
//! free-text name resolution (exact, then unique prefix, then unique
//! substring).

use serde::{Deserialize, Serialize};

use super::error::GameError;
use crate::roles::Role;

/// Participant identifier, assigned by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// One participant's mutable record.
///
/// `role` is unset until assignment, and changes afterwards only through
/// the two documented conversions (Cursed turning wolf, a bitten villager
/// turning vampire) or a Troublemaker swap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Option<Role>,
    pub alive: bool,
}

/// Insertion-ordered player registry. Owned by the `Game`; the engine is
/// the only mutator of `role` and `alive`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered players, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no one has joined yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Register a new player. Fails if the id is already present.
    pub fn add(&mut self, id: PlayerId, name: impl Into<String>) -> Result<(), GameError> {
        if self.contains(id) {
            return Err(GameError::AlreadyJoined);
        }
        self.players.push(Player {
            id,
            name: name.into(),
            role: None,
            alive: true,
        });
        Ok(())
    }

    /// Look up a player by id.
    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Whether the id is registered (dead players count).
    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    /// Whether the id is registered and alive.
    #[must_use]
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.alive)
    }

    /// The player's current role, if assigned.
    #[must_use]
    pub fn role(&self, id: PlayerId) -> Option<Role> {
        self.get(id).and_then(|p| p.role)
    }

    pub(crate) fn set_role(&mut self, id: PlayerId, role: Role) {
        if let Some(p) = self.get_mut(id) {
            p.role = Some(role);
        }
    }

    /// Mark a player dead. Returns false if unknown or already dead.
    pub(crate) fn kill(&mut self, id: PlayerId) -> bool {
        match self.get_mut(id) {
            Some(p) if p.alive => {
                p.alive = false;
                true
            }
            _ => false,
        }
    }

    /// All players in join order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// All registered ids in join order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    /// Living players in join order.
    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    /// Number of living players.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// Living players sorted alphabetically by name (ties broken by id),
    /// paired with their 1-based display number.
    #[must_use]
    pub fn alive_numbered(&self) -> Vec<(usize, &Player)> {
        let mut out: Vec<&Player> = self.alive().collect();
        out.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        out.into_iter().enumerate().map(|(i, p)| (i + 1, p)).collect()
    }

    /// Resolve a 1-based number from the alphabetical alive list.
    #[must_use]
    pub fn by_number(&self, number: usize) -> Option<PlayerId> {
        self.alive_numbered()
            .into_iter()
            .find(|(n, _)| *n == number)
            .map(|(_, p)| p.id)
    }

    /// Resolve free text against living players' names: exact match, then
    /// unique prefix, then unique substring. More than one match at the
    /// deciding tier is `Ambiguous`; none anywhere is `InvalidTarget`.
    /// Matching is case-insensitive.
    pub fn resolve_name(&self, query: &str) -> Result<PlayerId, GameError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(GameError::InvalidTarget);
        }

        for tier in 0..3 {
            let mut matches = self
                .alive()
                .filter(|p| {
                    let name = p.name.to_lowercase();
                    match tier {
                        0 => name == needle,
                        1 => name.starts_with(&needle),
                        _ => name.contains(&needle),
                    }
                })
                .map(|p| p.id);
            match (matches.next(), matches.next()) {
                (Some(id), None) => return Ok(id),
                (Some(_), Some(_)) => return Err(GameError::Ambiguous),
                (None, _) => {}
            }
        }
        Err(GameError::InvalidTarget)
    }
}
