//! Whole-game flows: the lobby-to-winner loop, registry stability, and
//! each team's path to victory.

use werewolf_engine::{Ballot, Game, GameError, GameEvent, Phase, PlayerId, Role, Winner};

fn lobby(n: u64, seed: u64) -> Game {
    let mut game = Game::new(seed);
    for i in 1..=n {
        game.add_player(PlayerId::new(i), format!("p{i}")).unwrap();
    }
    game
}

fn holder(game: &Game, role: Role) -> PlayerId {
    holders(game, role)[0]
}

fn holders(game: &Game, role: Role) -> Vec<PlayerId> {
    game.roster()
        .iter()
        .filter(|p| p.role == Some(role))
        .map(|p| p.id)
        .collect()
}

fn gang_up(game: &mut Game, target: PlayerId) {
    let voters: Vec<PlayerId> = game
        .roster()
        .alive()
        .map(|p| p.id)
        .filter(|id| *id != target)
        .collect();
    for voter in voters {
        game.vote(voter, Ballot::Player(target)).unwrap();
    }
}

/// The worked example: a self-saving doctor survives the first night.
#[test]
fn first_night_with_a_self_saving_doctor() {
    let mut game = lobby(5, 40);
    game.assign_roles(&[
        Role::Werewolf,
        Role::Seer,
        Role::Doctor,
        Role::Villager,
        Role::Villager,
    ])
    .unwrap();
    assert_eq!(game.phase(), Phase::Night);

    let wolf = holder(&game, Role::Werewolf);
    let doctor = holder(&game, Role::Doctor);
    game.wolf_kill(wolf, doctor).unwrap();
    game.doctor_save(doctor, doctor).unwrap();

    let summary = game.resolve_night().unwrap();
    assert!(summary.deaths.is_empty());
    assert_eq!(game.phase(), Phase::Day);
    assert_eq!(game.day_count(), 1);
}

/// The worked example without a doctor: the kill lands and the game
/// continues while at least two non-wolves live.
#[test]
fn first_night_without_protection() {
    let mut game = lobby(5, 41);
    game.assign_roles(&[Role::Werewolf, Role::Seer]).unwrap();

    let wolf = holder(&game, Role::Werewolf);
    let victim = holders(&game, Role::Villager)[0];
    game.wolf_kill(wolf, victim).unwrap();

    let summary = game.resolve_night().unwrap();
    let dead: Vec<PlayerId> = summary.deaths.iter().map(|d| d.player).collect();
    assert_eq!(dead, vec![victim]);
    assert_eq!(game.evaluate_winner(), None);
    assert!(!game.is_over());
}

/// One wolf eats the village night by night; the registry never shrinks
/// and the wolves win at parity.
#[test]
fn lone_werewolf_eats_to_parity() {
    let mut game = lobby(5, 42);
    let joined: Vec<PlayerId> = game.roster().ids().collect();
    game.assign_roles(&[Role::Werewolf]).unwrap();

    let wolf = holder(&game, Role::Werewolf);
    let mut nights = 0u32;
    let winner = loop {
        nights += 1;
        let prey = game
            .roster()
            .alive()
            .find(|p| p.id != wolf)
            .map(|p| p.id)
            .expect("prey remains while the game runs");
        game.wolf_kill(wolf, prey).unwrap();
        let summary = game.resolve_night().unwrap();
        assert_eq!(summary.deaths.len(), 1);
        assert_eq!(game.day_count(), nights);
        if let Some(winner) = summary.winner {
            break winner;
        }
        game.end_day().unwrap();
    };

    // Four villagers, kills land every night: parity after the third.
    assert_eq!(winner, Winner::Wolves);
    assert_eq!(nights, 3);
    assert_eq!(game.phase(), Phase::Over);

    // Everyone who ever joined is still registered, dead or alive.
    assert_eq!(game.roster().len(), 5);
    for id in joined {
        assert!(game.roster().contains(id));
    }

    // The log tells the whole story.
    let died = game
        .history()
        .iter()
        .filter(|r| matches!(r.event, GameEvent::Died { .. }))
        .count();
    assert_eq!(died, 3);
    assert!(game
        .history()
        .iter()
        .any(|r| matches!(r.event, GameEvent::Ended { winner: Winner::Wolves })));
}

#[test]
fn lovers_outlive_the_village() {
    let mut game = lobby(5, 43);
    game.assign_roles(&[Role::Cupid, Role::Werewolf]).unwrap();
    let cupid = holder(&game, Role::Cupid);
    let wolf = holder(&game, Role::Werewolf);
    let villagers = holders(&game, Role::Villager);

    game.cupid_pair(cupid, villagers[0], villagers[1]).unwrap();
    game.wolf_kill(wolf, villagers[2]).unwrap();
    game.resolve_night().unwrap();
    game.end_day().unwrap();

    game.wolf_kill(wolf, cupid).unwrap();
    game.resolve_night().unwrap();

    // The lovers and the wolf remain; the village turns on the wolf.
    gang_up(&mut game, wolf);
    let outcome = game.end_day().unwrap();
    assert_eq!(outcome.winner, Some(Winner::Lovers));
    assert_eq!(game.phase(), Phase::Over);
}

#[test]
fn vampires_win_by_converting_everyone() {
    let mut game = lobby(5, 44);
    game.assign_roles(&[Role::Vampire, Role::Werewolf]).unwrap();
    let vampire = holder(&game, Role::Vampire);
    let wolf = holder(&game, Role::Werewolf);
    let villagers = holders(&game, Role::Villager);

    game.vampire_bite(vampire, villagers[0]).unwrap();
    game.resolve_night().unwrap();
    gang_up(&mut game, wolf);
    game.end_day().unwrap();

    game.vampire_bite(vampire, villagers[1]).unwrap();
    game.resolve_night().unwrap();
    game.end_day().unwrap();

    game.vampire_bite(vampire, villagers[2]).unwrap();
    let summary = game.resolve_night().unwrap();
    assert_eq!(summary.winner, Some(Winner::Vampires));
    assert_eq!(game.winner(), Some(Winner::Vampires));
}

#[test]
fn cult_wins_by_outnumbering() {
    let mut game = lobby(5, 45);
    game.assign_roles(&[Role::CultLeader, Role::Werewolf]).unwrap();
    let leader = holder(&game, Role::CultLeader);
    let wolf = holder(&game, Role::Werewolf);
    let villagers = holders(&game, Role::Villager);

    game.cult_recruit(leader, villagers[0]).unwrap();
    game.resolve_night().unwrap();
    assert_eq!(game.evaluate_winner(), None);

    gang_up(&mut game, wolf);
    game.end_day().unwrap();

    game.cult_recruit(leader, villagers[1]).unwrap();
    let summary = game.resolve_night().unwrap();
    assert_eq!(summary.winner, Some(Winner::Cult));
}

#[test]
fn village_wins_by_lynching_the_last_wolf() {
    let mut game = lobby(5, 46);
    game.assign_roles(&[Role::Werewolf, Role::Seer]).unwrap();
    let wolf = holder(&game, Role::Werewolf);

    game.resolve_night().unwrap();
    gang_up(&mut game, wolf);
    let outcome = game.end_day().unwrap();

    assert_eq!(outcome.winner, Some(Winner::Village));
    assert_eq!(game.phase(), Phase::Over);
    // Dead wolves stay registered too.
    assert_eq!(game.roster().len(), 5);
}

#[test]
fn finished_games_reject_everything() {
    let mut game = lobby(5, 47);
    game.assign_roles(&[Role::Werewolf, Role::Seer]).unwrap();
    let wolf = holder(&game, Role::Werewolf);
    game.resolve_night().unwrap();
    gang_up(&mut game, wolf);
    game.end_day().unwrap();
    assert!(game.is_over());

    let anyone = PlayerId::new(1);
    assert_eq!(game.resolve_night().unwrap_err(), GameError::WrongPhase);
    assert_eq!(game.end_day().unwrap_err(), GameError::WrongPhase);
    assert_eq!(game.vote(anyone, Ballot::Skip), Err(GameError::WrongPhase));
    assert_eq!(game.seer_peek(anyone, anyone), Err(GameError::WrongPhase));
    assert_eq!(
        game.add_player(PlayerId::new(99), "late"),
        Err(GameError::AlreadyStarted)
    );
}
