//! The turn orchestrator. Drives one `PerformTurn` call end-to-end:
//! validation through the engine, state mutation, inline prompts with the
//! acting player, deck replenishment, win detection and turn advance.
//! Runs under the game's mutex, so turns never interleave within a room.

use chrono::Utc;
use rand::thread_rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    card::{Card, Face},
    engine::{self, RequestLevel},
    exception::{ConnectionError, GameError, StateError, SystemError},
    server::input_handler::PromptRegistry,
};

use super::{
    msg::{GameEvent, MessageKind},
    persist::Persist,
    state::{Game, TurnRecord},
    RoomChannel,
};

pub enum TurnOutcome {
    /// The turn was rejected; the caller was told and nothing changed.
    Rejected(GameError),
    Completed,
    /// The game terminated during this turn.
    Ended,
}

pub async fn run_turn(
    game: &mut Game,
    channel: &RoomChannel,
    prompts: &PromptRegistry,
    persister: &dyn Persist,
    player_id: Uuid,
    cards: Vec<Card>,
) -> TurnOutcome {
    let seat_index = match game.seat_index(player_id) {
        Some(index) => index,
        None => {
            return reject(
                channel,
                player_id,
                ConnectionError::UnknownPlayer(player_id).into(),
            )
        }
    };
    if !game.is_started() {
        return reject(channel, player_id, StateError::NotStarted.into());
    }
    if game.is_over() {
        return reject(channel, player_id, StateError::GameAlreadyOver.into());
    }
    if game.current_turn() != seat_index {
        return reject(channel, player_id, StateError::NotYourTurn.into());
    }
    if !game.seat(seat_index).hand.contains_all(&cards) {
        return reject(channel, player_id, StateError::CardsNotOwned.into());
    }

    let player_name = game.seat(seat_index).name.clone();

    // Last turn's debt becomes this player's problem. The roll is undone
    // if validation rejects the sequence, so a bad turn changes nothing.
    let (prev_pick, prev_give) = game.roll_counters();

    let snapshot = match game.snapshot() {
        Some(snapshot) => snapshot,
        None => {
            game.restore_counters(prev_pick, prev_give);
            return reject(
                channel,
                player_id,
                SystemError::Internal("started game with an empty pile".to_string()).into(),
            );
        }
    };
    let delta = match engine::evaluate(&snapshot, &cards) {
        Ok(delta) => delta,
        Err(turn_error) => {
            game.restore_counters(prev_pick, prev_give);
            channel.send_to(
                player_id,
                GameEvent::ReceiveSystemMessage {
                    text: turn_error.player_message().to_string(),
                    kind: MessageKind::Error,
                },
            );
            channel.send_to(player_id, GameEvent::NotifyTurnProcessed { valid: false });
            return TurnOutcome::Rejected(turn_error.into());
        }
    };

    info!(
        player = %player_id,
        cards = cards.len(),
        pick = delta.pick,
        give = delta.give,
        skip = delta.skip,
        "turn accepted"
    );

    // Move the cards from the hand onto the pile.
    if !cards.is_empty() {
        if let Err(error) = game.hand_mut(seat_index).remove(&cards) {
            game.restore_counters(prev_pick, prev_give);
            return reject(channel, player_id, error);
        }
        for card in &cards {
            game.push_to_pile(*card);
        }
        channel.broadcast(GameEvent::AddCardRangeToPile {
            cards: cards.clone(),
        });
        channel.send_to(
            player_id,
            GameEvent::RemoveCardRangeFromHand {
                cards: cards.clone(),
            },
        );
        channel.send_others(
            player_id,
            GameEvent::RemoveCardsFromPlayerHand {
                player_id,
                count: cards.len(),
            },
        );
    }
    channel.send_to(player_id, GameEvent::NotifyTurnProcessed { valid: true });
    persister.persist(game);

    // Request bookkeeping: discharge first, then let the ace demand a new
    // card from the acting player.
    let mut issued_request = None;
    if delta.remove_request_levels > 0 {
        game.set_request(None);
        channel.broadcast(GameEvent::SetCurrentRequest { card: None });
    }
    if delta.request_level != RequestLevel::NoRequest {
        let specific = delta.request_level == RequestLevel::CardRequest;
        channel.send_to(player_id, GameEvent::PromptCardRequest { specific });
        match prompts.await_card(player_id).await {
            Ok(answer) => {
                let request = if specific {
                    answer
                } else {
                    Card::new(answer.suit, Face::None)
                };
                info!(player = %player_id, request = %request, "card request placed");
                game.set_request(Some(request));
                issued_request = Some(request);
                channel.broadcast(GameEvent::SetCurrentRequest {
                    card: Some(request),
                });
            }
            Err(error) => return abort_turn(game, channel, persister, &player_name, error),
        }
    }

    if delta.reverse {
        let forward = !game.is_forward();
        game.set_direction_forward(forward);
    }
    game.set_counters(delta.pick, delta.give);

    // Replenishment: draw the owed cards, reclaiming the pile into the
    // deck when the deck runs dry.
    if game.pick() > 0 {
        let need = game.pick() as usize;
        let drawn = match game.try_deal_many(need) {
            Ok(drawn) => drawn,
            Err(_) => {
                if game.pile_len() + game.deck_len() > need + 1 {
                    let reclaimed = match game.reclaim_pile() {
                        Ok(reclaimed) => reclaimed,
                        Err(_) => {
                            return end_game(
                                game,
                                channel,
                                persister,
                                "insufficient cards".to_string(),
                                None,
                            )
                        }
                    };
                    channel.broadcast(GameEvent::ReclaimPile);
                    let count = reclaimed.len();
                    for card in reclaimed {
                        game.push_to_deck(card);
                    }
                    channel.broadcast(GameEvent::AddCardsToDeck { count });
                    game.shuffle_deck(&mut thread_rng());
                    match game.try_deal_many(need) {
                        Ok(drawn) => drawn,
                        Err(_) => {
                            return end_game(
                                game,
                                channel,
                                persister,
                                "insufficient cards".to_string(),
                                None,
                            )
                        }
                    }
                } else {
                    return end_game(
                        game,
                        channel,
                        persister,
                        "insufficient cards".to_string(),
                        None,
                    );
                }
            }
        };
        game.hand_mut(seat_index).add(drawn.clone());
        channel.broadcast(GameEvent::RemoveCardsFromDeck { count: drawn.len() });
        channel.send_to(player_id, GameEvent::AddCardRangeToHand { cards: drawn });
        channel.send_others(
            player_id,
            GameEvent::AddCardsToPlayerHand {
                player_id,
                count: need,
            },
        );
        game.set_counters(0, game.give());
        persister.persist(game);
    }

    // Win or last-card round-trip.
    if game.seat(seat_index).hand.is_empty() {
        let closed_with_boring = cards.last().map(|c| c.is_boring()).unwrap_or(false);
        if game.seat(seat_index).hand.is_last_card() && closed_with_boring {
            game.record_turn(TurnRecord {
                player: player_id,
                cards,
                request: issued_request,
                at: Utc::now(),
            });
            return end_game(
                game,
                channel,
                persister,
                format!("{} won the game", player_name),
                Some(player_id),
            );
        }
        // Going cardless without a declaration (or off a special card)
        // does not end the game; the player draws on the next cycle.
        channel.broadcast(GameEvent::ReceiveSystemMessage {
            text: format!("{} is cardless", player_name),
            kind: MessageKind::Info,
        });
    } else {
        channel.send_to(player_id, GameEvent::PromptLastCardRequest);
        match prompts.await_last_card(player_id).await {
            Ok(true) => {
                game.hand_mut(seat_index).declare_last_card();
                channel.send_others(
                    player_id,
                    GameEvent::ReceiveSystemMessage {
                        text: format!("{} is on their last card", player_name),
                        kind: MessageKind::Warning,
                    },
                );
            }
            Ok(false) => {}
            Err(error) => return abort_turn(game, channel, persister, &player_name, error),
        }
    }

    game.advance_turn(delta.skip);
    channel.broadcast(GameEvent::UpdateTurn {
        index: game.current_turn(),
    });
    game.record_turn(TurnRecord {
        player: player_id,
        cards,
        request: issued_request,
        at: Utc::now(),
    });
    persister.persist(game);
    TurnOutcome::Completed
}

fn reject(channel: &RoomChannel, player_id: Uuid, error: GameError) -> TurnOutcome {
    channel.send_to(
        player_id,
        GameEvent::ReceiveSystemMessage {
            text: error.to_string(),
            kind: MessageKind::Error,
        },
    );
    channel.send_to(player_id, GameEvent::NotifyTurnProcessed { valid: false });
    TurnOutcome::Rejected(error)
}

fn end_game(
    game: &mut Game,
    channel: &RoomChannel,
    persister: &dyn Persist,
    reason: String,
    winner: Option<Uuid>,
) -> TurnOutcome {
    info!(%reason, ?winner, "game over");
    game.finish(winner);
    channel.broadcast(GameEvent::EndGame { reason, winner });
    persister.persist(game);
    TurnOutcome::Ended
}

/// A prompt await came back cancelled: the acting player disconnected or
/// ran out the answer clock. The turn stops where it is and the game ends.
fn abort_turn(
    game: &mut Game,
    channel: &RoomChannel,
    persister: &dyn Persist,
    player_name: &str,
    error: GameError,
) -> TurnOutcome {
    warn!(player = player_name, %error, "prompt await aborted");
    let reason = match &error {
        GameError::Connection(ConnectionError::PromptTimeout) => {
            format!("{} did not respond in time", player_name)
        }
        _ => format!("{} disconnected", player_name),
    };
    end_game(game, channel, persister, reason, None)
}
