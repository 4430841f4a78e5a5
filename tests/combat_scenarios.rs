//! Combat and ability scenarios on hand-staged boards

mod common;

use common::{catalog, empty_game, standard};
use rampart::core::{DamageSource, Rank, Suit};
use rampart::error::Precondition;
use rampart::game::abilities::resolve_cast;
use rampart::game::combat::{melee_attack, ranged_attack, resolve_joker};
use rampart::game::{
    AbilityOutcome, AttackOutcome, GameEvent, PromptKind, ScriptStep, ScriptedController, Seats,
    Selection, ZeroController,
};
use rampart::zones::Zone;
use smallvec::smallvec;
use std::sync::Arc;

#[test]
fn test_melee_with_no_action_points_is_rejected() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let attacker = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Spades), Zone::Field)
        .unwrap();
    let target = game
        .add_card_to_zone(p2, standard(&catalog, Rank::King, Suit::Hearts), Zone::Field)
        .unwrap();
    game.card_mut(attacker).unwrap().action_points = 0;
    let before = serde_json::to_string(&game).unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

    let err = melee_attack(&mut game, &mut seats, attacker).unwrap_err();
    assert!(err.is_precondition());
    assert_eq!(err.precondition(), Some(&Precondition::NoActionPoints(attacker)));
    assert_eq!(game.card(target).unwrap().damage_points, 3);
    assert_eq!(serde_json::to_string(&game).unwrap(), before);
}

#[test]
fn test_ranged_without_resource_spends_nothing() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let marksman = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Jack, Suit::Hearts), Zone::Battlement)
        .unwrap();
    let target = game
        .add_card_to_zone(p2, standard(&catalog, Rank::King, Suit::Clubs), Zone::Field)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

    let err = ranged_attack(&mut game, &mut seats, marksman).unwrap_err();
    assert_eq!(
        err.precondition(),
        Some(&Precondition::MissingDamageSource {
            card: marksman,
            required: DamageSource::Ammo
        })
    );
    assert_eq!(game.card(marksman).unwrap().action_points, 1);
    assert_eq!(game.card(target).unwrap().damage_points, 3);
}

#[test]
fn test_ranged_with_ammo_consumes_it_and_hits() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let marksman = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Jack, Suit::Hearts), Zone::Battlement)
        .unwrap();
    let ammo = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Three, Suit::Spades), Zone::Hand)
        .unwrap();
    let target = game
        .add_card_to_zone(p2, standard(&catalog, Rank::King, Suit::Clubs), Zone::Field)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

    let outcome = ranged_attack(&mut game, &mut seats, marksman).unwrap();
    assert!(outcome.landed());
    assert_eq!(game.locate(ammo), Some(Zone::Discard));
    assert_eq!(game.card(marksman).unwrap().action_points, 0);
    assert_eq!(game.card(target).unwrap().damage_points, 1);
}

#[test]
fn test_attack_on_wall_removes_front_card() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let attacker = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Spades), Zone::Field)
        .unwrap();
    let front = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Two, Suit::Hearts), Zone::Wall)
        .unwrap();
    let back = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Three, Suit::Hearts), Zone::Wall)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

    let outcome = melee_attack(&mut game, &mut seats, attacker).unwrap();
    assert_eq!(outcome, AttackOutcome::WallBreached { card: front });
    assert_eq!(game.locate(front), Some(Zone::Discard));
    assert_eq!(game.locate(back), Some(Zone::Wall));
    assert!(game.card(attacker).unwrap().has_attacked);
}

#[test]
fn test_wall_trap_destroys_unprotected_attacker() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let attacker = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Spades), Zone::Field)
        .unwrap();
    let trap = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Seven, Suit::Clubs), Zone::Wall)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    {
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);
        let outcome = melee_attack(&mut game, &mut seats, attacker).unwrap();
        assert_eq!(outcome, AttackOutcome::TrapSprung { trap });
        seats.flush(&mut game);
    }

    assert_eq!(game.locate(attacker), Some(Zone::Discard));
    assert_eq!(game.locate(trap), Some(Zone::Discard));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::TrapTriggered { trap: t, attacker: a } if *t == trap && *a == attacker)));
}

#[test]
fn test_block_card_bypasses_trap() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let attacker = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Spades), Zone::Field)
        .unwrap();
    let shield = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Four, Suit::Diamonds), Zone::Hand)
        .unwrap();
    let trap = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Seven, Suit::Hearts), Zone::Wall)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

    let outcome = melee_attack(&mut game, &mut seats, attacker).unwrap();
    assert_eq!(outcome, AttackOutcome::TrapBypassed { trap, blocker: shield });
    assert_eq!(game.locate(attacker), Some(Zone::Field));
    assert_eq!(game.locate(shield), Some(Zone::Discard));
    assert_eq!(game.locate(trap), Some(Zone::Discard));
}

#[test]
fn test_joker_without_character_goes_nowhere() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let joker = game
        .add_card_to_zone(p1, Arc::clone(catalog.joker()), Zone::Hand)
        .unwrap();
    let defender = game
        .add_card_to_zone(p2, standard(&catalog, Rank::King, Suit::Hearts), Zone::Field)
        .unwrap();
    let wall = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Two, Suit::Clubs), Zone::Wall)
        .unwrap();

    let mut c1 = ZeroController::new(p1);
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

    let outcome = resolve_cast(&mut game, &mut seats, p1, joker).unwrap();
    assert_eq!(outcome, AbilityOutcome::Fizzled);
    assert_eq!(game.card(defender).unwrap().damage_points, 3);
    assert_eq!(game.locate(wall), Some(Zone::Wall));
    assert!(game
        .pending_events()
        .iter()
        .any(|e| matches!(e, GameEvent::AbilityFizzled { card, .. } if *card == joker)));
}

#[test]
fn test_joker_bonus_point_exhausts_field_before_wall() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, p2] = game.player_ids();
    let joker = game
        .add_card_to_zone(p1, Arc::clone(catalog.joker()), Zone::Hand)
        .unwrap();
    let knight = game
        .add_card_to_zone(p1, standard(&catalog, Rank::King, Suit::Spades), Zone::Field)
        .unwrap();
    // Queens have 2 damage points
    let queen = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Queen, Suit::Clubs), Zone::Field)
        .unwrap();
    let front = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Two, Suit::Clubs), Zone::Wall)
        .unwrap();
    let back = game
        .add_card_to_zone(p2, standard(&catalog, Rank::Three, Suit::Clubs), Zone::Wall)
        .unwrap();

    let mut c1 = ScriptedController::with_steps(
        p1,
        vec![ScriptStep::on(PromptKind::JokerBonusSpend, Selection::Many(smallvec![0]))],
    );
    let mut c2 = ZeroController::new(p2);
    let mut events: Vec<GameEvent> = Vec::new();
    let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

    let outcome = resolve_joker(&mut game, &mut seats, p1, joker, 2).unwrap();
    assert_eq!(outcome, AbilityOutcome::Resolved);
    assert_eq!(game.card(knight).unwrap().action_points, 0);
    assert_eq!(game.locate(queen), Some(Zone::Discard));
    assert_eq!(game.locate(front), Some(Zone::Discard));
    assert_eq!(game.locate(back), Some(Zone::Wall));
}

#[test]
fn test_wall_overflow_goes_to_discard() {
    let catalog = catalog();
    let mut game = empty_game();
    let [p1, _] = game.player_ids();
    let filler = standard(&catalog, Rank::Two, Suit::Clubs);
    for _ in 0..14 {
        game.add_card_to_zone(p1, Arc::clone(&filler), Zone::Wall).unwrap();
    }
    let extra = game
        .add_card_to_zone(p1, standard(&catalog, Rank::Three, Suit::Clubs), Zone::Hand)
        .unwrap();

    let landed = game.move_card(extra, Zone::Hand, Zone::Wall).unwrap();
    assert_eq!(landed, Zone::Discard);
    assert_eq!(game.zones(p1).unwrap().wall.len(), 14);
    assert!(game
        .pending_events()
        .iter()
        .any(|e| matches!(e, GameEvent::WallOverflow { card, .. } if *card == extra)));
}
