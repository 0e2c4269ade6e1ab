//! Role assignment: deal the deck and enter the first night.

use crate::core::{GameError, PlayerId};
use crate::roles::Role;

use super::event::GameEvent;
use super::night::NightIntents;
use super::{Game, Phase};

impl Game {
    /// Deal `deck` to the roster and start the first night.
    ///
    /// A deck shorter than the roster is padded with Villagers; a longer
    /// one is truncated. Roster order and deck order are shuffled
    /// independently, so the deal leaks no role-to-join-order
    /// correlation. Assigning also seeds the team sets and resets every
    /// transient and carried modifier, leaving `phase == Night` and
    /// `day_count == 0`.
    ///
    /// Fails with `AlreadyStarted` outside the lobby and
    /// `NotEnoughPlayers` below the configured minimum; neither failure
    /// mutates anything.
    pub fn assign_roles(&mut self, deck: &[Role]) -> Result<(), GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.roster.len() < self.config.min_players {
            return Err(GameError::NotEnoughPlayers);
        }

        let mut ids: Vec<PlayerId> = self.roster.ids().collect();
        let mut pool: Vec<Role> = deck.to_vec();
        self.rng.shuffle(&mut ids);
        self.rng.shuffle(&mut pool);
        if pool.len() < ids.len() {
            pool.resize(ids.len(), Role::Villager);
        }
        pool.truncate(ids.len());

        self.wolves.clear();
        self.vampires.clear();
        self.cult.clear();
        self.masons.clear();
        self.night = NightIntents::default();
        self.votes.clear();
        self.effects.clear();
        self.heal_available = true;
        self.poison_available = true;
        self.last_protected = None;
        self.lovers = None;
        self.revealed_mayors.clear();
        self.revealed_princes.clear();
        self.winner = None;

        for (&id, &role) in ids.iter().zip(pool.iter()) {
            self.roster.set_role(id, role);
            self.enroll_role_teams(id, role);
        }

        self.phase = Phase::Night;
        self.day_count = 0;
        self.record(GameEvent::RolesAssigned { players: ids.len() });
        tracing::debug!(players = ids.len(), "roles assigned, night falls");
        Ok(())
    }
}
