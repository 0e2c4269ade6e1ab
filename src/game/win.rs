//! Win-condition evaluation.
//!
//! A pure function over the living roster and the team sets, consulted
//! after every resolution step that can kill. Rules are checked in
//! priority order; the first match wins. The Tanner's lynch win is not
//! here - lynching a Tanner short-circuits inside day resolution.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{Player, PlayerId, Roster};
use crate::roles::Role;

/// Which side took the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Village,
    Wolves,
    Vampires,
    Cult,
    Lovers,
    LoneWolf,
    Tanner,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Winner::Village => "the village",
            Winner::Wolves => "the wolves",
            Winner::Vampires => "the vampires",
            Winner::Cult => "the cult",
            Winner::Lovers => "the lovers",
            Winner::LoneWolf => "the lone wolf",
            Winner::Tanner => "the tanner",
        })
    }
}

/// Evaluate the win conditions in priority order.
///
/// Returns `None` while the game should continue.
#[must_use]
pub fn evaluate(
    roster: &Roster,
    wolves: &FxHashSet<PlayerId>,
    vampires: &FxHashSet<PlayerId>,
    cult: &FxHashSet<PlayerId>,
    lovers: Option<(PlayerId, PlayerId)>,
) -> Option<Winner> {
    let alive: Vec<&Player> = roster.alive().collect();
    let alive_count = alive.len();

    // 1. The lovers are the last two standing.
    if let Some((a, b)) = lovers {
        if alive_count == 2 && roster.is_alive(a) && roster.is_alive(b) {
            return Some(Winner::Lovers);
        }
    }

    // 2. A Lone Wolf as sole survivor beats every team outcome.
    if alive_count == 1 && alive[0].role == Some(Role::LoneWolf) {
        return Some(Winner::LoneWolf);
    }

    let wolf_alive = alive.iter().filter(|p| wolves.contains(&p.id)).count();
    let vampire_alive = alive.iter().filter(|p| vampires.contains(&p.id)).count();
    let cult_alive = alive.iter().filter(|p| cult.contains(&p.id)).count();

    // 3. Everyone left is on the vampire team.
    if alive_count > 0 && vampire_alive == alive_count {
        return Some(Winner::Vampires);
    }

    // 4. The cult strictly outnumbers everyone else.
    if cult_alive > alive_count - cult_alive {
        return Some(Winner::Cult);
    }

    // 5. No hostile team remains.
    if wolf_alive == 0 && vampire_alive == 0 && cult_alive == 0 {
        return Some(Winner::Village);
    }

    // 6. Wolves at parity with the villager class, with no vampire or
    //    cult presence left. Neutral solo roles sit outside the count.
    let villager_class = alive
        .iter()
        .filter(|p| {
            !wolves.contains(&p.id)
                && !vampires.contains(&p.id)
                && !cult.contains(&p.id)
                && !matches!(p.role, Some(Role::Tanner | Role::Hoodlum))
        })
        .count();
    if vampire_alive == 0 && cult_alive == 0 && wolf_alive >= villager_class {
        return Some(Winner::Wolves);
    }

    None
}
