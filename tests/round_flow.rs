//! Round manager flow driven by scripted and seeded controllers

mod common;

use common::{catalog, empty_game, standard};
use rampart::core::{Rank, Suit};
use rampart::deck::SeededShuffle;
use rampart::game::{
    GameConfig, GameEvent, GameState, Phase, PromptKind, RandomController,
    RoundManager, ScriptStep, ScriptedController, Seats, Selection, ZeroController,
};
use rampart::zones::Zone;
use smallvec::smallvec;

/// A staged game whose decks will not run dry within a round
fn staged() -> GameState {
    let catalog = catalog();
    let mut game = empty_game();
    for player in game.player_ids() {
        for _ in 0..10 {
            game.add_card_to_deck(player, standard(&catalog, Rank::Two, Suit::Hearts))
                .unwrap();
        }
    }
    game
}

#[test]
fn test_random_games_keep_invariants() {
    let catalog = catalog();
    for seed in 1..=5u64 {
        let mut game = GameState::new_two_player(
            "Alice",
            "Bob",
            &catalog,
            GameConfig::default().with_seed(seed),
            &mut SeededShuffle::new(seed),
        );
        let [p1, p2] = game.player_ids();
        let mut c1 = RandomController::with_seed(p1, seed + 100);
        let mut c2 = RandomController::with_seed(p2, seed + 200);
        let mut events: Vec<GameEvent> = Vec::new();

        let result = RoundManager::new(&mut game)
            .run_game(&mut c1, &mut c2, &mut events)
            .unwrap();

        game.audit_invariants().unwrap();
        assert_eq!(game.total_cards(p1).unwrap(), 106, "seed {seed}");
        assert_eq!(game.total_cards(p2).unwrap(), 106, "seed {seed}");
        assert_eq!(result.scores, game.scores().unwrap());
        assert_eq!(result.winner, game.leader().unwrap());

        let rounds_started = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundStarted { .. }))
            .count();
        assert_eq!(rounds_started as u32, result.rounds_played);
    }
}

#[test]
fn test_opening_deal() {
    let catalog = catalog();
    let mut game = GameState::new_two_player(
        "Alice",
        "Bob",
        &catalog,
        GameConfig::default(),
        &mut SeededShuffle::new(3),
    );
    for player in game.player_ids() {
        assert_eq!(game.deck_len(player), 106);
    }

    game.deal_opening().unwrap();
    for player in game.player_ids() {
        let zones = game.zones(player).unwrap();
        assert_eq!(game.deck_len(player), 86);
        assert_eq!(zones.wall.len(), 10);
        assert_eq!(zones.hand.len(), 10);
        assert_eq!(game.total_cards(player).unwrap(), 106);
    }
}

#[test]
fn test_phases_run_in_fixed_order() {
    let mut game = staged();
    let [p1, p2] = game.player_ids();
    let catalog = catalog();
    game.add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Clubs), Zone::Field)
        .unwrap();
    game.add_card_to_zone(p2, standard(&catalog, Rank::King, Suit::Hearts), Zone::Field)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let result = RoundManager::new(&mut game)
        .with_max_rounds(1)
        .run_game(&mut c1, &mut c2, &mut events)
        .unwrap();
    assert_eq!(result.rounds_played, 1);

    let phases: Vec<Phase> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PhaseEntered { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            Phase::Draw,
            Phase::AspPlacement,
            Phase::AspResolution,
            Phase::Movement,
            Phase::Melee,
            Phase::Ranged,
            Phase::Refortify,
            Phase::Cleanup,
        ]
    );
}

#[test]
fn test_movement_moves_only_chosen_characters() {
    let catalog = catalog();
    let mut game = staged();
    let [p1, p2] = game.player_ids();
    let stays = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Clubs), Zone::Battlement)
        .unwrap();
    let moves = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Ace, Suit::Clubs), Zone::Battlement)
        .unwrap();

    let mut c1 = ScriptedController::with_steps(
        p1,
        vec![ScriptStep::on(PromptKind::MoveToField, Selection::Many(smallvec![1]))],
    );
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);
    RoundManager::new(&mut game)
        .run_phase(&mut seats, Phase::Movement)
        .unwrap();
    drop(seats);

    assert_eq!(game.locate(stays), Some(Zone::Battlement));
    assert_eq!(game.locate(moves), Some(Zone::Field));
}

#[test]
fn test_melee_phase_attacks_once_per_action_point() {
    let catalog = catalog();
    let mut game = staged();
    let [p1, p2] = game.player_ids();
    let king = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Clubs), Zone::Field)
        .unwrap();
    let wall: Vec<_> = (0..3)
        .map(|_| {
            game.add_card_to_zone(p2, standard(&catalog, Rank::Two, Suit::Spades), Zone::Wall)
                .unwrap()
        })
        .collect();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);
    RoundManager::new(&mut game)
        .run_phase(&mut seats, Phase::Melee)
        .unwrap();
    drop(seats);

    assert_eq!(game.card(king).unwrap().action_points, 0);
    assert_eq!(game.locate(wall[0]), Some(Zone::Discard));
    assert_eq!(game.locate(wall[1]), Some(Zone::Wall));
    assert_eq!(game.zones(p2).unwrap().wall.len(), 2);
}

#[test]
fn test_ranged_phase_skips_characters_without_source() {
    let catalog = catalog();
    let mut game = staged();
    let [p1, p2] = game.player_ids();
    let marksman = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Jack, Suit::Spades), Zone::Battlement)
        .unwrap();
    let target = game
        .add_card_to_zone(p2, standard(&catalog, Rank::King, Suit::Hearts), Zone::Field)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    {
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);
        RoundManager::new(&mut game)
            .run_phase(&mut seats, Phase::Ranged)
            .unwrap();
        seats.flush(&mut game);
    }

    assert_eq!(game.card(marksman).unwrap().action_points, 1);
    assert_eq!(game.card(target).unwrap().damage_points, 3);
    let prevented = events
        .iter()
        .filter(|e| matches!(e, GameEvent::RangedAttackPrevented { .. }))
        .count();
    assert_eq!(prevented, 1);
}

#[test]
fn test_refortify_resets_trap_from_discard() {
    let catalog = catalog();
    let mut game = staged();
    let [p1, p2] = game.player_ids();
    let king = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Clubs), Zone::Field)
        .unwrap();
    let trap = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Seven, Suit::Spades), Zone::Discard)
        .unwrap();

    // Empty hand, no Ten: the only actions are ResetTrap and Pass
    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);
    RoundManager::new(&mut game)
        .run_phase(&mut seats, Phase::Refortify)
        .unwrap();
    drop(seats);

    assert_eq!(game.locate(trap), Some(Zone::Wall));
    assert!(game.card(trap).unwrap().face_down);
    assert_eq!(game.card(king).unwrap().action_points, 0);
    assert_eq!(game.score(p1).unwrap(), 4);
}

#[test]
fn test_refortify_draw_with_ten() {
    let catalog = catalog();
    let mut game = staged();
    let [p1, p2] = game.player_ids();
    game.add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Clubs), Zone::Field)
        .unwrap();
    let ten = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Ten, Suit::Hearts), Zone::Hand)
        .unwrap();

    // Actions: PlaceInWall, Discard, DrawWithTen, Pass
    let mut c1 = ScriptedController::with_steps(
        p1,
        vec![ScriptStep::on(PromptKind::RefortifyAction, Selection::One(2))],
    );
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);
    RoundManager::new(&mut game)
        .run_phase(&mut seats, Phase::Refortify)
        .unwrap();
    drop(seats);

    assert_eq!(game.locate(ten), Some(Zone::Discard));
    assert_eq!(game.zones(p1).unwrap().hand.len(), 1);
    assert_eq!(game.deck_len(p1), 9);
}

#[test]
fn test_cleanup_discards_exhausted_characters() {
    let catalog = catalog();
    let mut game = staged();
    let [p1, p2] = game.player_ids();
    let worn = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Clubs), Zone::Field)
        .unwrap();
    game.card_mut(worn).unwrap().damage_points = 0;

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);
    RoundManager::new(&mut game)
        .run_phase(&mut seats, Phase::Cleanup)
        .unwrap();
    drop(seats);

    assert_eq!(game.locate(worn), Some(Zone::Discard));
}
