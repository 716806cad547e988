//! Game state invariants: start-up dealing, conservation, reclaim,
//! turn-index arithmetic and seating rules.

use karata_core::card::{Card, Face, Suit};
use karata_core::engine::RequestLevel;
use karata_core::enums::{STANDARD_DECK_SIZE, STARTING_HAND_SIZE};
use karata_core::game::state::Game;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn seated_game(players: usize) -> (Game, Vec<Uuid>) {
    let mut game = Game::new();
    let mut ids = Vec::new();
    for i in 0..players {
        let id = Uuid::new_v4();
        game.add_seat(id, format!("player-{}", i)).unwrap();
        ids.push(id);
    }
    (game, ids)
}

#[test]
fn start_deals_a_boring_top_and_four_cards_each() {
    for players in 2..=4 {
        let (mut game, _) = seated_game(players);
        game.start(&mut StdRng::seed_from_u64(7)).unwrap();

        assert!(game.is_started());
        assert_eq!(game.pile_len(), 1);
        assert!(game.pile_top().unwrap().is_boring());
        for seat in game.seats() {
            assert_eq!(seat.hand.len(), STARTING_HAND_SIZE);
        }
        assert_eq!(game.card_count(), STANDARD_DECK_SIZE);
        assert_eq!(game.current_turn(), 0);
        assert!(game.is_forward());
    }
}

#[test]
fn start_rejects_lonely_and_repeated_starts() {
    let (mut game, _) = seated_game(1);
    assert!(game.start(&mut StdRng::seed_from_u64(1)).is_err());

    let (mut game, _) = seated_game(2);
    game.start(&mut StdRng::seed_from_u64(1)).unwrap();
    assert!(game.start(&mut StdRng::seed_from_u64(1)).is_err());
}

#[test]
fn seating_is_bounded_and_unique() {
    let (mut game, ids) = seated_game(4);
    assert!(game.add_seat(Uuid::new_v4(), "fifth".into()).is_err());
    // same player cannot sit twice
    let (mut game2, _) = seated_game(2);
    let dup = game2.seats()[0].id;
    assert!(game2.add_seat(dup, "again".into()).is_err());

    game.start(&mut StdRng::seed_from_u64(3)).unwrap();
    assert!(game.add_seat(Uuid::new_v4(), "late".into()).is_err());
    assert_eq!(game.seat_index(ids[2]), Some(2));
}

#[test]
fn advance_turn_honors_direction_and_wraps() {
    let (mut game, _) = seated_game(3);
    game.start(&mut StdRng::seed_from_u64(5)).unwrap();

    game.advance_turn(2);
    assert_eq!(game.current_turn(), 2);

    game.set_direction_forward(false);
    game.advance_turn(1);
    assert_eq!(game.current_turn(), 1);
    game.advance_turn(2);
    assert_eq!(game.current_turn(), 2);

    // skip 0: the player goes again
    game.advance_turn(0);
    assert_eq!(game.current_turn(), 2);
}

#[test]
fn counters_roll_and_restore() {
    let (mut game, _) = seated_game(2);
    game.set_counters(0, 5);
    let (prev_pick, prev_give) = game.roll_counters();
    assert_eq!((game.pick(), game.give()), (5, 0));
    game.restore_counters(prev_pick, prev_give);
    assert_eq!((game.pick(), game.give()), (0, 5));
}

#[test]
fn request_level_follows_the_stored_card() {
    let (mut game, _) = seated_game(2);
    assert_eq!(game.request_level(), RequestLevel::NoRequest);

    game.set_request(Some(Card::new(Suit::Clubs, Face::None)));
    assert_eq!(game.request_level(), RequestLevel::SuitRequest);

    game.set_request(Some(Card::new(Suit::Clubs, Face::Nine)));
    assert_eq!(game.request_level(), RequestLevel::CardRequest);

    game.set_request(None);
    assert_eq!(game.request_level(), RequestLevel::NoRequest);
}

#[test]
fn reclaim_feeds_the_deck_and_conserves_cards() {
    let (mut game, _) = seated_game(2);
    game.start(&mut StdRng::seed_from_u64(11)).unwrap();

    // play a few cards onto the pile from the first hand
    let played: Vec<Card> = game.seat(0).hand.cards().to_vec();
    game.hand_mut(0).remove(&played).unwrap();
    for card in &played {
        game.push_to_pile(*card);
    }
    assert_eq!(game.pile_len(), 1 + played.len());
    assert_eq!(game.card_count(), STANDARD_DECK_SIZE);

    let top_before = *game.pile_top().unwrap();
    let reclaimed = game.reclaim_pile().unwrap();
    assert_eq!(reclaimed.len(), played.len());
    assert_eq!(game.pile_len(), 1);
    assert_eq!(*game.pile_top().unwrap(), top_before);

    for card in reclaimed {
        game.push_to_deck(card);
    }
    assert_eq!(game.card_count(), STANDARD_DECK_SIZE);
}

proptest! {
    /// Any interleaving of draws, plays, reclaims and turn advances keeps
    /// all 54 cards accounted for and the turn index in bounds.
    #[test]
    fn conservation_holds_under_random_mutation(seed in any::<u64>(), ops in proptest::collection::vec(0u8..4, 1..60)) {
        let (mut game, _) = seated_game(3);
        game.start(&mut StdRng::seed_from_u64(seed)).unwrap();

        for op in ops {
            match op {
                // draw one card to the current hand
                0 => {
                    if game.deck_len() > 0 {
                        let card = game.deal_one().unwrap();
                        let turn = game.current_turn();
                        game.hand_mut(turn).add(vec![card]);
                    }
                }
                // play one card from the current hand
                1 => {
                    let turn = game.current_turn();
                    if let Some(card) = game.seat(turn).hand.cards().first().copied() {
                        game.hand_mut(turn).remove(&[card]).unwrap();
                        game.push_to_pile(card);
                    }
                }
                // reclaim the pile into the deck
                2 => {
                    if game.pile_len() >= 2 {
                        let reclaimed = game.reclaim_pile().unwrap();
                        for card in reclaimed {
                            game.push_to_deck(card);
                        }
                        game.shuffle_deck(&mut StdRng::seed_from_u64(seed));
                    }
                }
                _ => game.advance_turn(1),
            }

            prop_assert_eq!(game.card_count(), STANDARD_DECK_SIZE);
            prop_assert!(game.pile_len() >= 1);
            prop_assert!(game.current_turn() < game.seats().len());
        }
    }
}
