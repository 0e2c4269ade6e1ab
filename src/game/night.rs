//! Night-action intake and the night-resolution pipeline.
//!
//! Intake is one validated setter per actionable role. Each call records
//! a single pending intent and nothing else (no deaths, no conversions),
//! so a rejected call never leaves the game half-updated, and players may
//! change their mind until resolution (last call wins; the wolves' kill
//! vote accumulates per wolf instead).
//!
//! `resolve_night` then consumes every intent in a fixed order:
//!
//! 1. status commit (silence, binding, lover pairing, role swap)
//! 2. wolf kill tally, plurality with a random tie break
//! 3. protection set (doctor ∪ bodyguard ∪ priest)
//! 4. witch heal, pulling its target off the kill list
//! 5. cult recruitment
//! 6. vampire bite: convert plain villagers, kill everyone else
//! 7. death application with role modifiers (Tough Guy, Cursed, Diseased)
//! 8. witch poison, bypassing the modifiers
//! 9. lover grief
//! 10. clear intents, advance to day
//! 11. summary
//!
//! The ordering is observable: a heal beats a kill because step 4 runs
//! before step 7, and a poisoned Tough Guy dies because step 8 ignores
//! step 7's modifiers.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameError, PlayerId};
use crate::effects::EffectKind;
use crate::roles::{Alignment, Role};

use super::event::{DeathCause, GameEvent};
use super::win::Winner;
use super::{Game, Phase};

/// Transient per-night intent slots. Fully consumed by resolution; only
/// the explicitly carried modifiers (bodyguard's last pick, potion
/// availability, scheduled effects) survive it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct NightIntents {
    pub wolf_votes: FxHashMap<PlayerId, PlayerId>,
    pub seer: Option<PlayerId>,
    pub aura: Option<PlayerId>,
    pub sorceress: Option<PlayerId>,
    pub priest: Option<PlayerId>,
    pub doctor: Option<PlayerId>,
    pub bodyguard: Option<PlayerId>,
    pub heal: Option<PlayerId>,
    pub poison: Option<PlayerId>,
    pub bite: Option<PlayerId>,
    pub recruit: Option<PlayerId>,
    pub silence: Option<PlayerId>,
    pub pair: Option<(PlayerId, PlayerId)>,
    pub bind: Option<(PlayerId, PlayerId)>,
    pub swap: Option<(PlayerId, PlayerId)>,
    pub investigate: Option<(PlayerId, PlayerId)>,
}

/// A death applied during one night.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub player: PlayerId,
    pub name: String,
    pub role: Role,
    pub cause: DeathCause,
}

/// Id plus display name, for summary rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPlayer {
    pub player: PlayerId,
    pub name: String,
}

/// What the information roles learned tonight.
///
/// Snapshotted before any of the night's mutations, so a peeked Cursed
/// reads as Cursed even if the wolves turn them the same night. The
/// transport forwards each field to the actor who asked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visions {
    /// Seer: the target's exact role.
    pub seer: Option<(PlayerId, Role)>,
    /// Aura Seer: whether the target's role acts at night.
    pub aura: Option<(PlayerId, bool)>,
    /// Sorceress: whether the target is the Seer or their apprentice.
    pub sorceress: Option<(PlayerId, bool)>,
    /// Paranormal Investigator: whether either checked player is
    /// wolf-aligned.
    pub investigator: Option<((PlayerId, PlayerId), bool)>,
}

/// Everything one night resolved to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightSummary {
    /// Deaths in application order.
    pub deaths: Vec<Death>,
    /// A villager turned vampire by the bite, if any.
    pub converted: Option<NamedPlayer>,
    /// A new cult member, if any.
    pub recruited: Option<NamedPlayer>,
    pub visions: Visions,
    /// The day now beginning (or just reached, if the game ended).
    pub day: u32,
    pub winner: Option<Winner>,
}

impl std::fmt::Display for NightSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Night ends.")?;
        if self.deaths.is_empty() {
            write!(f, " Nobody died.")?;
        } else {
            let names: Vec<&str> = self.deaths.iter().map(|d| d.name.as_str()).collect();
            write!(f, " Died: {}.", names.join(", "))?;
        }
        if let Some(c) = &self.converted {
            write!(f, " {} was turned into a vampire.", c.name)?;
        }
        if let Some(r) = &self.recruited {
            write!(f, " {} joined the cult.", r.name)?;
        }
        match self.winner {
            Some(winner) => write!(f, " The game is over: victory for {winner}."),
            None => write!(f, " Day {} begins.", self.day),
        }
    }
}

impl Game {
    // === Intake validation helpers ===

    fn night_phase(&self) -> Result<(), GameError> {
        if self.phase == Phase::Night {
            Ok(())
        } else {
            Err(GameError::WrongPhase)
        }
    }

    fn not_bound(&self, actor: PlayerId) -> Result<(), GameError> {
        if self.effects.scheduled(EffectKind::BoundTonight, actor) {
            Err(GameError::Bound)
        } else {
            Ok(())
        }
    }

    /// Phase, role, and binding checks shared by every setter.
    fn night_actor(&self, actor: PlayerId, role: Role) -> Result<(), GameError> {
        self.night_phase()?;
        let holds = self
            .roster
            .get(actor)
            .is_some_and(|p| p.alive && p.role == Some(role));
        if !holds {
            return Err(GameError::RoleMismatch);
        }
        self.not_bound(actor)
    }

    fn living(&self, target: PlayerId) -> Result<(), GameError> {
        if self.roster.is_alive(target) {
            Ok(())
        } else {
            Err(GameError::InvalidTarget)
        }
    }

    fn living_pair(&self, a: PlayerId, b: PlayerId) -> Result<(), GameError> {
        if a == b {
            return Err(GameError::InvalidTarget);
        }
        self.living(a)?;
        self.living(b)
    }

    // === Intake setters ===

    /// Cast or change a wolf's kill vote. Open to all three killing
    /// roles; one vote per wolf, tallied at resolution.
    pub fn wolf_kill(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_phase()?;
        let is_killer = self
            .roster
            .get(actor)
            .is_some_and(|p| p.alive && p.role.is_some_and(Role::is_killing_wolf));
        if !is_killer {
            return Err(GameError::RoleMismatch);
        }
        self.not_bound(actor)?;
        self.living(target)?;
        self.night.wolf_votes.insert(actor, target);
        Ok(())
    }

    pub fn seer_peek(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Seer)?;
        self.living(target)?;
        self.night.seer = Some(target);
        Ok(())
    }

    pub fn aura_peek(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::AuraSeer)?;
        self.living(target)?;
        self.night.aura = Some(target);
        Ok(())
    }

    pub fn sorceress_scry(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Sorceress)?;
        self.living(target)?;
        self.night.sorceress = Some(target);
        Ok(())
    }

    pub fn priest_bless(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Priest)?;
        self.living(target)?;
        self.night.priest = Some(target);
        Ok(())
    }

    pub fn doctor_save(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Doctor)?;
        self.living(target)?;
        self.night.doctor = Some(target);
        Ok(())
    }

    /// Protect a player. The bodyguard may not pick the same player two
    /// nights in a row.
    pub fn bodyguard_protect(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Bodyguard)?;
        self.living(target)?;
        if self.last_protected == Some(target) {
            return Err(GameError::RepeatTarget);
        }
        self.night.bodyguard = Some(target);
        Ok(())
    }

    /// Spend the one-time heal on a player. The target only has to exist:
    /// healing someone already marked for death tonight is the point.
    pub fn witch_heal(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Witch)?;
        if !self.roster.contains(target) {
            return Err(GameError::InvalidTarget);
        }
        if !self.heal_available {
            return Err(GameError::ResourceExhausted);
        }
        self.night.heal = Some(target);
        Ok(())
    }

    /// Spend the one-time poison on a player.
    pub fn witch_poison(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Witch)?;
        self.living(target)?;
        if !self.poison_available {
            return Err(GameError::ResourceExhausted);
        }
        self.night.poison = Some(target);
        Ok(())
    }

    /// Silence a player for the coming day's vote.
    pub fn old_hag_silence(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::OldHag)?;
        self.living(target)?;
        self.night.silence = Some(target);
        Ok(())
    }

    pub fn vampire_bite(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::Vampire)?;
        self.living(target)?;
        self.night.bite = Some(target);
        Ok(())
    }

    pub fn cult_recruit(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), GameError> {
        self.night_actor(actor, Role::CultLeader)?;
        self.living(target)?;
        self.night.recruit = Some(target);
        Ok(())
    }

    /// Join two players as lovers; committed at resolution.
    pub fn cupid_pair(
        &mut self,
        actor: PlayerId,
        first: PlayerId,
        second: PlayerId,
    ) -> Result<(), GameError> {
        self.night_actor(actor, Role::Cupid)?;
        self.living_pair(first, second)?;
        self.night.pair = Some((first, second));
        Ok(())
    }

    /// Bind two players out of the next night's actions.
    pub fn spellcaster_bind(
        &mut self,
        actor: PlayerId,
        first: PlayerId,
        second: PlayerId,
    ) -> Result<(), GameError> {
        self.night_actor(actor, Role::Spellcaster)?;
        self.living_pair(first, second)?;
        self.night.bind = Some((first, second));
        Ok(())
    }

    /// Swap two players' roles; committed at resolution.
    pub fn troublemaker_swap(
        &mut self,
        actor: PlayerId,
        first: PlayerId,
        second: PlayerId,
    ) -> Result<(), GameError> {
        self.night_actor(actor, Role::Troublemaker)?;
        self.living_pair(first, second)?;
        self.night.swap = Some((first, second));
        Ok(())
    }

    /// Check a pair of players for a wolf presence.
    pub fn investigate(
        &mut self,
        actor: PlayerId,
        first: PlayerId,
        second: PlayerId,
    ) -> Result<(), GameError> {
        self.night_actor(actor, Role::ParanormalInvestigator)?;
        self.living_pair(first, second)?;
        self.night.investigate = Some((first, second));
        Ok(())
    }

    // === Resolution ===

    /// Resolve every pending intent, apply deaths and conversions, and
    /// advance to day. At most once per night: a second call fails with
    /// `WrongPhase` because the first one left the night.
    pub fn resolve_night(&mut self) -> Result<NightSummary, GameError> {
        self.night_phase()?;
        let intents = std::mem::take(&mut self.night);

        let visions = self.snapshot_visions(&intents);

        // 1. Status commit. The silenced and bound sets are rebuilt from
        //    scratch each night; the lovers pair and a role swap land here
        //    so intake itself never touches persistent state.
        self.effects.clear_kind(EffectKind::SilencedToday);
        if let Some(target) = intents.silence {
            if self.roster.is_alive(target) {
                self.effects.schedule(EffectKind::SilencedToday, target);
            }
        }
        self.effects.clear_kind(EffectKind::BoundTonight);
        if let Some((a, b)) = intents.bind {
            for target in [a, b] {
                if self.roster.is_alive(target) {
                    self.effects.schedule(EffectKind::BoundTonight, target);
                }
            }
        }
        if let Some((a, b)) = intents.pair {
            if self.roster.is_alive(a) && self.roster.is_alive(b) {
                self.lovers = Some((a, b));
                self.record(GameEvent::Paired { first: a, second: b });
            }
        }
        if let Some((a, b)) = intents.swap {
            if self.roster.is_alive(a) && self.roster.is_alive(b) {
                self.swap_roles(a, b);
            }
        }

        // 2. Wolf kill tally. A scheduled skip eats the vote, and the
        //    flag clears whether or not any votes were cast.
        let skip_kill = self.effects.take_global(EffectKind::SkipWolfKill);
        let mut candidates: SmallVec<[(PlayerId, DeathCause); 4]> = SmallVec::new();
        if !skip_kill {
            if let Some(target) = self.wolf_plurality(&intents.wolf_votes) {
                candidates.push((target, DeathCause::WolfKill));
            }
        }

        // 3. Protection set. The bodyguard's pick persists for the
        //    no-repeat rule whether or not it mattered tonight.
        let mut protected: FxHashSet<PlayerId> = FxHashSet::default();
        for target in [intents.doctor, intents.bodyguard, intents.priest]
            .into_iter()
            .flatten()
        {
            protected.insert(target);
        }
        self.last_protected = intents.bodyguard;

        // 4. Witch heal. One use ever.
        if let Some(target) = intents.heal {
            self.heal_available = false;
            candidates.retain(|(c, _)| *c != target);
            protected.insert(target);
        }

        // 5. Cult recruitment. Protected, wolf, and vampire targets are
        //    immune; the role itself does not change.
        let mut recruited = None;
        if let Some(target) = intents.recruit {
            if self.roster.is_alive(target)
                && !protected.contains(&target)
                && !self.wolves.contains(&target)
                && !self.vampires.contains(&target)
            {
                self.cult.insert(target);
                self.record(GameEvent::Recruited { player: target });
                recruited = Some(self.named(target));
            }
        }

        // 6. Vampire bite: a plain villager converts, anyone else is
        //    marked for death instead.
        let mut converted = None;
        if let Some(target) = intents.bite {
            if self.roster.is_alive(target) && !protected.contains(&target) {
                let convertible = self.roster.role(target).is_some_and(|r| {
                    r.alignment() == Alignment::Village && !r.is_seer_class()
                });
                if convertible {
                    self.roster.set_role(target, Role::Vampire);
                    self.vampires.insert(target);
                    self.record(GameEvent::Converted {
                        player: target,
                        role: Role::Vampire,
                    });
                    converted = Some(self.named(target));
                } else {
                    candidates.push((target, DeathCause::Bite));
                }
            }
        }

        // 7. Death application with role modifiers.
        let mut deaths: Vec<Death> = Vec::new();
        for (target, cause) in candidates {
            if protected.contains(&target) || !self.roster.is_alive(target) {
                continue;
            }
            match self.roster.role(target) {
                // First hit is absorbed; the marker makes the next one land.
                Some(Role::ToughGuy)
                    if !self.effects.scheduled(EffectKind::PendingDeath, target) =>
                {
                    self.effects.schedule(EffectKind::PendingDeath, target);
                }
                Some(Role::Cursed) => {
                    self.roster.set_role(target, Role::Werewolf);
                    self.wolves.insert(target);
                    self.record(GameEvent::Converted {
                        player: target,
                        role: Role::Werewolf,
                    });
                }
                role => {
                    if role == Some(Role::Diseased) {
                        self.effects.schedule_global(EffectKind::SkipWolfKill);
                    }
                    self.effects.consume(EffectKind::PendingDeath, target);
                    self.apply_death(&mut deaths, target, cause);
                }
            }
        }

        // 8. Witch poison: its own pipeline, no death modifiers.
        if let Some(target) = intents.poison {
            self.poison_available = false;
            if self.roster.is_alive(target) && !protected.contains(&target) {
                self.apply_death(&mut deaths, target, DeathCause::Poison);
            }
        }

        // 9. A surviving lover follows a dead one.
        if let Some((a, b)) = self.lovers {
            let a_died = deaths.iter().any(|d| d.player == a);
            let b_died = deaths.iter().any(|d| d.player == b);
            let griever = match (a_died, b_died) {
                (true, false) if self.roster.is_alive(b) => Some(b),
                (false, true) if self.roster.is_alive(a) => Some(a),
                _ => None,
            };
            if let Some(target) = griever {
                self.apply_death(&mut deaths, target, DeathCause::Grief);
            }
        }

        // 10. Advance. Intents were consumed by the take at the top.
        self.phase = Phase::Day;
        self.votes.clear();
        self.day_count += 1;

        self.check_winner();
        tracing::debug!(deaths = deaths.len(), day = self.day_count, "night resolved");

        // 11. Summary.
        Ok(NightSummary {
            deaths,
            converted,
            recruited,
            visions,
            day: self.day_count,
            winner: self.winner,
        })
    }

    fn snapshot_visions(&self, intents: &NightIntents) -> Visions {
        Visions {
            seer: intents
                .seer
                .and_then(|t| self.roster.role(t).map(|r| (t, r))),
            aura: intents
                .aura
                .and_then(|t| self.roster.role(t).map(|r| (t, r.has_night_action()))),
            sorceress: intents.sorceress.and_then(|t| {
                self.roster
                    .role(t)
                    .map(|r| (t, matches!(r, Role::Seer | Role::ApprenticeSeer)))
            }),
            investigator: intents.investigate.map(|(a, b)| {
                ((a, b), self.wolves.contains(&a) || self.wolves.contains(&b))
            }),
        }
    }

    /// Plurality winner of the wolves' votes; ties break uniformly at
    /// random. Tied ids are sorted first so a seed replays identically.
    fn wolf_plurality(&mut self, votes: &FxHashMap<PlayerId, PlayerId>) -> Option<PlayerId> {
        let mut counts: FxHashMap<PlayerId, u32> = FxHashMap::default();
        for &target in votes.values() {
            *counts.entry(target).or_insert(0) += 1;
        }
        let top = counts.values().copied().max()?;
        let mut leaders: Vec<PlayerId> = counts
            .iter()
            .filter(|(_, count)| **count == top)
            .map(|(target, _)| *target)
            .collect();
        leaders.sort_unstable();
        self.rng.choose(&leaders).copied()
    }

    fn apply_death(&mut self, deaths: &mut Vec<Death>, target: PlayerId, cause: DeathCause) {
        let Some((name, role)) = self
            .roster
            .get(target)
            .map(|p| (p.name.clone(), p.role.unwrap_or(Role::Villager)))
        else {
            return;
        };
        if self.kill(target, cause) {
            deaths.push(Death {
                player: target,
                name,
                role,
                cause,
            });
        }
    }

    fn swap_roles(&mut self, a: PlayerId, b: PlayerId) {
        if let (Some(role_a), Some(role_b)) = (self.roster.role(a), self.roster.role(b)) {
            self.retire_role_teams(a, role_a);
            self.retire_role_teams(b, role_b);
            self.roster.set_role(a, role_b);
            self.roster.set_role(b, role_a);
            self.enroll_role_teams(a, role_b);
            self.enroll_role_teams(b, role_a);
        }
    }

    fn named(&self, id: PlayerId) -> NamedPlayer {
        NamedPlayer {
            player: id,
            name: self
                .roster
                .get(id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        }
    }
}
