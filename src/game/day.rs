//! Day voting and lynch resolution.
//!
//! Ballots accumulate during the day (latest call wins) and are weighed
//! only when the day ends: a revealed Mayor counts double, a Village
//! Idiot's ballot is recorded but weighs nothing. `end_day` computes the
//! plurality with the skip sentinel in play, applies the Prince and
//! Tanner special cases, and hands the game back to night.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{GameError, PlayerId};
use crate::effects::EffectKind;
use crate::roles::Role;

use super::event::{DeathCause, GameEvent};
use super::win::Winner;
use super::{Game, Phase};

/// A single day-phase ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ballot {
    Player(PlayerId),
    /// An explicit "lynch nobody" choice; it can win the plurality.
    Skip,
}

/// What ending the day decided.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// No votes, a tie, a skip plurality, or a zero-weight plurality.
    NoLynch,
    /// The target was an unrevealed Prince: the lynch is cancelled and
    /// the immunity is spent. Once per Prince.
    PrinceRevealed { player: PlayerId, name: String },
    /// The plurality target died. A `role` of `Role::Hunter` is the
    /// transport's cue to mediate the revenge shot.
    Lynched {
        player: PlayerId,
        name: String,
        role: Role,
    },
    /// Lynching a Tanner ends the game on the spot in the Tanner's favor.
    TannerLynched { player: PlayerId, name: String },
}

/// The day's verdict plus the winner, if the lynch ended the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub verdict: Verdict,
    pub winner: Option<Winner>,
}

impl std::fmt::Display for DayOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.verdict {
            Verdict::NoLynch => write!(f, "The day ends with no lynch.")?,
            Verdict::PrinceRevealed { name, .. } => {
                write!(f, "{name} reveals the Prince and survives the vote.")?;
            }
            Verdict::Lynched { name, role, .. } => {
                write!(f, "{name} was lynched. They were the {role}.")?;
                if *role == Role::Hunter {
                    write!(f, " The Hunter's shot is still owed.")?;
                }
            }
            Verdict::TannerLynched { name, .. } => {
                write!(f, "{name} was lynched, which is exactly what they wanted.")?;
            }
        }
        match self.winner {
            Some(winner) => write!(f, " The game is over: victory for {winner}."),
            None => write!(f, " Night falls."),
        }
    }
}

impl Game {
    /// Record or overwrite a ballot. Dead voters and silenced voters are
    /// rejected; the target must be alive or the skip sentinel.
    pub fn vote(&mut self, voter: PlayerId, ballot: Ballot) -> Result<(), GameError> {
        if self.phase != Phase::Day {
            return Err(GameError::WrongPhase);
        }
        if !self.roster.is_alive(voter) {
            return Err(GameError::RoleMismatch);
        }
        if self.effects.scheduled(EffectKind::SilencedToday, voter) {
            return Err(GameError::Bound);
        }
        if let Ballot::Player(target) = ballot {
            if !self.roster.is_alive(target) {
                return Err(GameError::InvalidTarget);
            }
        }
        self.votes.insert(voter, ballot);
        Ok(())
    }

    /// Step forward as Mayor, doubling this player's vote weight for the
    /// rest of the game. Idempotent.
    pub fn reveal_mayor(&mut self, actor: PlayerId) -> Result<(), GameError> {
        if self.phase != Phase::Day {
            return Err(GameError::WrongPhase);
        }
        let is_mayor = self
            .roster
            .get(actor)
            .is_some_and(|p| p.alive && p.role == Some(Role::Mayor));
        if !is_mayor {
            return Err(GameError::RoleMismatch);
        }
        if self.revealed_mayors.insert(actor) {
            self.record(GameEvent::MayorRevealed { player: actor });
        }
        Ok(())
    }

    /// Weighted totals of the ballots cast so far.
    #[must_use]
    pub fn tally(&self) -> FxHashMap<Ballot, u32> {
        let mut totals: FxHashMap<Ballot, u32> = FxHashMap::default();
        for (&voter, &ballot) in &self.votes {
            *totals.entry(ballot).or_insert(0) += self.vote_weight(voter);
        }
        totals
    }

    fn vote_weight(&self, voter: PlayerId) -> u32 {
        match self.roster.role(voter) {
            // Recorded for participation, never counted.
            Some(Role::VillageIdiot) => 0,
            _ if self.revealed_mayors.contains(&voter) => 2,
            _ => 1,
        }
    }

    /// Close the vote, resolve the lynch, and advance to night (or end
    /// the game). `day_count` never changes here.
    pub fn end_day(&mut self) -> Result<DayOutcome, GameError> {
        if self.phase != Phase::Day {
            return Err(GameError::WrongPhase);
        }
        let totals = self.tally();
        self.votes.clear();

        let verdict = match Self::plurality(&totals) {
            None => Verdict::NoLynch,
            Some(target) => self.resolve_lynch(target),
        };

        if matches!(verdict, Verdict::TannerLynched { .. }) {
            self.phase = Phase::Over;
        } else {
            self.phase = Phase::Night;
            self.check_winner();
        }
        tracing::debug!(?verdict, "day resolved");
        Ok(DayOutcome {
            verdict,
            winner: self.winner,
        })
    }

    /// The sole maximum-weight target, if the plurality picked one.
    /// Ties, a winning skip, and a zero-weight maximum all mean no lynch.
    fn plurality(totals: &FxHashMap<Ballot, u32>) -> Option<PlayerId> {
        let top = totals.values().copied().max()?;
        if top == 0 {
            return None;
        }
        let mut leaders = totals
            .iter()
            .filter(|(_, weight)| **weight == top)
            .map(|(ballot, _)| *ballot);
        match (leaders.next(), leaders.next()) {
            (Some(Ballot::Player(target)), None) => Some(target),
            _ => None,
        }
    }

    fn resolve_lynch(&mut self, target: PlayerId) -> Verdict {
        let name = self
            .roster
            .get(target)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let role = self.roster.role(target).unwrap_or(Role::Villager);

        if role == Role::Prince && !self.revealed_princes.contains(&target) {
            self.revealed_princes.insert(target);
            self.record(GameEvent::PrinceRevealed { player: target });
            return Verdict::PrinceRevealed {
                player: target,
                name,
            };
        }
        if role == Role::Tanner {
            self.kill(target, DeathCause::Lynch);
            self.winner = Some(Winner::Tanner);
            self.record(GameEvent::Ended {
                winner: Winner::Tanner,
            });
            return Verdict::TannerLynched {
                player: target,
                name,
            };
        }

        self.kill(target, DeathCause::Lynch);
        if role == Role::WolfCub && self.config.wolf_cub_suppresses_kill {
            self.effects.schedule_global(EffectKind::SkipWolfKill);
        }
        Verdict::Lynched {
            player: target,
            name,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn in_day(deck: &[Role], n: u64) -> Game {
        let mut game = Game::new(11);
        for i in 1..=n {
            game.add_player(PlayerId::new(i), format!("p{i}")).unwrap();
        }
        game.assign_roles(deck).unwrap();
        game.resolve_night().unwrap();
        game
    }

    fn holder(game: &Game, role: Role) -> PlayerId {
        game.roster()
            .iter()
            .find(|p| p.role == Some(role))
            .map(|p| p.id)
            .expect("role not dealt")
    }

    #[test]
    fn test_vote_requires_day() {
        let mut game = Game::new(1);
        for i in 1..=5 {
            game.add_player(PlayerId::new(i), format!("p{i}")).unwrap();
        }
        game.assign_roles(&[Role::Werewolf]).unwrap();
        assert_eq!(
            game.vote(PlayerId::new(1), Ballot::Skip),
            Err(GameError::WrongPhase)
        );
    }

    #[test]
    fn test_vote_overwrites() {
        let deck = [Role::Werewolf; 1];
        let mut game = in_day(&deck, 5);
        let a = PlayerId::new(1);
        let b = PlayerId::new(2);
        game.vote(a, Ballot::Player(b)).unwrap();
        game.vote(a, Ballot::Skip).unwrap();
        let totals = game.tally();
        assert_eq!(totals.get(&Ballot::Skip), Some(&1));
        assert_eq!(totals.get(&Ballot::Player(b)), None);
    }

    #[test]
    fn test_village_idiot_weighs_nothing() {
        let deck = [Role::VillageIdiot, Role::Werewolf, Role::Villager, Role::Villager, Role::Villager];
        let mut game = in_day(&deck, 5);
        let idiot = holder(&game, Role::VillageIdiot);
        let wolf = holder(&game, Role::Werewolf);
        game.vote(idiot, Ballot::Player(wolf)).unwrap();
        let totals = game.tally();
        // Recorded as cast, weighed at zero.
        assert_eq!(totals.get(&Ballot::Player(wolf)), Some(&0));
        let outcome = game.end_day().unwrap();
        assert_eq!(outcome.verdict, Verdict::NoLynch);
        assert!(game.is_alive(wolf));
    }

    #[test]
    fn test_revealed_mayor_counts_double() {
        let deck = [Role::Mayor, Role::Werewolf, Role::Villager, Role::Villager, Role::Villager];
        let mut game = in_day(&deck, 5);
        let mayor = holder(&game, Role::Mayor);
        let wolf = holder(&game, Role::Werewolf);
        let villager = holder(&game, Role::Villager);

        game.reveal_mayor(mayor).unwrap();
        game.vote(mayor, Ballot::Player(wolf)).unwrap();
        // One plain vote the other way.
        game.vote(wolf, Ballot::Player(villager)).unwrap();

        let outcome = game.end_day().unwrap();
        assert_eq!(
            outcome.verdict,
            Verdict::Lynched {
                player: wolf,
                name: game.roster().get(wolf).unwrap().name.clone(),
                role: Role::Werewolf,
            }
        );
    }

    #[test]
    fn test_reveal_mayor_requires_the_role() {
        let deck = [Role::Mayor, Role::Werewolf, Role::Villager, Role::Villager, Role::Villager];
        let mut game = in_day(&deck, 5);
        let wolf = holder(&game, Role::Werewolf);
        assert_eq!(game.reveal_mayor(wolf), Err(GameError::RoleMismatch));
    }

    #[test]
    fn test_tie_means_no_lynch() {
        let deck = [Role::Werewolf; 1];
        let mut game = in_day(&deck, 5);
        let a = PlayerId::new(1);
        let b = PlayerId::new(2);
        game.vote(a, Ballot::Player(b)).unwrap();
        game.vote(b, Ballot::Player(a)).unwrap();
        let outcome = game.end_day().unwrap();
        assert_eq!(outcome.verdict, Verdict::NoLynch);
        assert_eq!(game.phase(), Phase::Night);
        assert!(game.is_alive(a) && game.is_alive(b));
    }

    #[test]
    fn test_winning_skip_cancels_lynch() {
        let deck = [Role::Werewolf; 1];
        let mut game = in_day(&deck, 5);
        let a = PlayerId::new(1);
        game.vote(PlayerId::new(2), Ballot::Skip).unwrap();
        game.vote(PlayerId::new(3), Ballot::Skip).unwrap();
        game.vote(PlayerId::new(4), Ballot::Player(a)).unwrap();
        let outcome = game.end_day().unwrap();
        assert_eq!(outcome.verdict, Verdict::NoLynch);
        assert!(game.is_alive(a));
    }

    #[test]
    fn test_end_day_clears_votes_and_keeps_day_count() {
        let deck = [Role::Werewolf; 1];
        let mut game = in_day(&deck, 5);
        game.vote(PlayerId::new(1), Ballot::Skip).unwrap();
        let before = game.day_count();
        game.end_day().unwrap();
        assert_eq!(game.day_count(), before);
        assert!(game.tally().is_empty());
    }
}
