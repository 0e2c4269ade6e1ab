//! The role catalog: every role the engine knows about, as pure data.
//!
//! Roles are a closed enum rather than name strings, so the resolution
//! pipeline can branch over them exhaustively. Behavior lives in a small
//! capability table:
//! - `alignment`: the team a role starts on
//! - `has_night_action`: whether the role submits a night intent
//! - `is_wolf_team` / `is_killing_wolf`: wolf-side membership vs. the
//!   subset that participates in the nightly kill vote
//! - `is_seer_class`: the protective/seer roles a vampire bite cannot
//!   convert (it kills them instead)
//!
//! Team membership can drift from `alignment` at runtime (cult recruits,
//! vampire conversion, a Cursed turning); the `Game`'s team sets track
//! that, not the catalog.

use serde::{Deserialize, Serialize};

/// Starting team of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Village,
    Wolf,
    Neutral,
}

/// Every role a deck may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    // Wolf side
    Werewolf,
    WolfCub,
    LoneWolf,
    Minion,
    // Village investigators and protectors
    Seer,
    ApprenticeSeer,
    AuraSeer,
    Priest,
    Bodyguard,
    Doctor,
    Witch,
    // Night-acting neutrals
    Sorceress,
    Vampire,
    CultLeader,
    // Everyone else
    Cupid,
    Cursed,
    Diseased,
    Doppelganger,
    Drunk,
    Ghost,
    Hoodlum,
    Hunter,
    Lycan,
    Mason,
    Mayor,
    OldHag,
    ParanormalInvestigator,
    Pacifist,
    Prince,
    Spellcaster,
    Tanner,
    ToughGuy,
    Troublemaker,
    VillageIdiot,
    Villager,
}

impl Role {
    /// All catalog entries, for deck building and property tests.
    pub const ALL: [Role; 35] = [
        Role::Werewolf,
        Role::WolfCub,
        Role::LoneWolf,
        Role::Minion,
        Role::Seer,
        Role::ApprenticeSeer,
        Role::AuraSeer,
        Role::Priest,
        Role::Bodyguard,
        Role::Doctor,
        Role::Witch,
        Role::Sorceress,
        Role::Vampire,
        Role::CultLeader,
        Role::Cupid,
        Role::Cursed,
        Role::Diseased,
        Role::Doppelganger,
        Role::Drunk,
        Role::Ghost,
        Role::Hoodlum,
        Role::Hunter,
        Role::Lycan,
        Role::Mason,
        Role::Mayor,
        Role::OldHag,
        Role::ParanormalInvestigator,
        Role::Pacifist,
        Role::Prince,
        Role::Spellcaster,
        Role::Tanner,
        Role::ToughGuy,
        Role::Troublemaker,
        Role::VillageIdiot,
        Role::Villager,
    ];

    /// Display name, as shown to players.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::Werewolf => "Werewolf",
            Role::WolfCub => "Wolf Cub",
            Role::LoneWolf => "Lone Wolf",
            Role::Minion => "Minion",
            Role::Seer => "Seer",
            Role::ApprenticeSeer => "Apprentice Seer",
            Role::AuraSeer => "Aura Seer",
            Role::Priest => "Priest",
            Role::Bodyguard => "Bodyguard",
            Role::Doctor => "Doctor",
            Role::Witch => "Witch",
            Role::Sorceress => "Sorceress",
            Role::Vampire => "Vampire",
            Role::CultLeader => "Cult Leader",
            Role::Cupid => "Cupid",
            Role::Cursed => "Cursed",
            Role::Diseased => "Diseased",
            Role::Doppelganger => "Doppelganger",
            Role::Drunk => "Drunk",
            Role::Ghost => "Ghost",
            Role::Hoodlum => "Hoodlum",
            Role::Hunter => "Hunter",
            Role::Lycan => "Lycan",
            Role::Mason => "Mason",
            Role::Mayor => "Mayor",
            Role::OldHag => "Old Hag",
            Role::ParanormalInvestigator => "Paranormal Investigator",
            Role::Pacifist => "Pacifist",
            Role::Prince => "Prince",
            Role::Spellcaster => "Spellcaster",
            Role::Tanner => "Tanner",
            Role::ToughGuy => "Tough Guy",
            Role::Troublemaker => "Troublemaker",
            Role::VillageIdiot => "Village Idiot",
            Role::Villager => "Villager",
        }
    }

    /// Starting alignment.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        match self {
            Role::Werewolf | Role::WolfCub | Role::LoneWolf | Role::Minion => Alignment::Wolf,
            Role::Sorceress
            | Role::Vampire
            | Role::CultLeader
            | Role::Doppelganger
            | Role::Ghost
            | Role::Hoodlum
            | Role::Tanner
            | Role::Troublemaker => Alignment::Neutral,
            _ => Alignment::Village,
        }
    }

    /// Whether the role submits an intent during the night.
    #[must_use]
    pub const fn has_night_action(self) -> bool {
        matches!(
            self,
            Role::Werewolf
                | Role::WolfCub
                | Role::LoneWolf
                | Role::Seer
                | Role::AuraSeer
                | Role::Sorceress
                | Role::Priest
                | Role::Bodyguard
                | Role::Doctor
                | Role::Witch
                | Role::Vampire
                | Role::CultLeader
                | Role::OldHag
                | Role::Cupid
                | Role::Spellcaster
                | Role::Troublemaker
                | Role::ParanormalInvestigator
        )
    }

    /// Wolf-side membership at assignment time. Includes the Minion, who
    /// never kills.
    #[must_use]
    pub const fn is_wolf_team(self) -> bool {
        matches!(
            self,
            Role::Werewolf | Role::WolfCub | Role::LoneWolf | Role::Minion
        )
    }

    /// The three roles that participate in the nightly kill vote.
    #[must_use]
    pub const fn is_killing_wolf(self) -> bool {
        matches!(self, Role::Werewolf | Role::WolfCub | Role::LoneWolf)
    }

    /// Protective and seer roles. A vampire bite kills these instead of
    /// converting them.
    #[must_use]
    pub const fn is_seer_class(self) -> bool {
        matches!(
            self,
            Role::Priest
                | Role::Seer
                | Role::ApprenticeSeer
                | Role::AuraSeer
                | Role::Bodyguard
                | Role::Witch
                | Role::Doctor
        )
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(Role::ALL.len(), 35);
        // No duplicates
        for (i, a) in Role::ALL.iter().enumerate() {
            for b in &Role::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_wolf_team_and_killers() {
        assert!(Role::Werewolf.is_wolf_team());
        assert!(Role::Minion.is_wolf_team());
        assert!(!Role::Minion.is_killing_wolf());
        assert!(Role::WolfCub.is_killing_wolf());
        assert!(Role::LoneWolf.is_killing_wolf());
        assert!(!Role::Vampire.is_wolf_team());
    }

    #[test]
    fn test_alignments() {
        assert_eq!(Role::Villager.alignment(), Alignment::Village);
        assert_eq!(Role::Minion.alignment(), Alignment::Wolf);
        assert_eq!(Role::Tanner.alignment(), Alignment::Neutral);
        assert_eq!(Role::Sorceress.alignment(), Alignment::Neutral);
        assert_eq!(Role::Lycan.alignment(), Alignment::Village);
    }

    #[test]
    fn test_seer_class_is_bite_proof() {
        for role in [
            Role::Priest,
            Role::Seer,
            Role::ApprenticeSeer,
            Role::AuraSeer,
            Role::Bodyguard,
            Role::Witch,
            Role::Doctor,
        ] {
            assert!(role.is_seer_class(), "{role} should be seer-class");
        }
        assert!(!Role::Villager.is_seer_class());
        assert!(!Role::Cursed.is_seer_class());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Role::WolfCub.to_string(), "Wolf Cub");
        assert_eq!(Role::ParanormalInvestigator.to_string(), "Paranormal Investigator");
    }
}
