use actix::{ActorContext, AsyncContext, Context, Handler, Message, Recipient, ResponseFuture};
use rand::thread_rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    enums::STANDARD_DECK_SIZE,
    exception::{ConnectionError, GameError, StateError},
    game::{msg::GameEvent, GameActor, RoomChannel},
};

/// A freshly upgraded WebSocket announces itself to the room.
#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct RegisterConnection {
    pub player_id: Uuid,
    pub name: String,
    pub recipient: Recipient<GameEvent>,
}

/// Sent by a connection actor as it stops, for any reason.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientDisconnected {
    pub player_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct StartGame {
    pub player_id: Uuid,
}

/// Internal: the game terminated, shut the actor down.
#[derive(Message)]
#[rtype(result = "()")]
pub struct StopGame;

impl Handler<RegisterConnection> for GameActor {
    type Result = ResponseFuture<Result<(), GameError>>;

    fn handle(&mut self, msg: RegisterConnection, _ctx: &mut Context<Self>) -> Self::Result {
        let game_id = self.game_id;
        let game = self.game.clone();
        let connections = self.connections.clone();

        Box::pin(async move {
            {
                let mut connections = connections.lock().await;
                if connections.contains_key(&msg.player_id) {
                    warn!(game_id = %game_id, player = %msg.player_id, "duplicate connection rejected");
                    return Err(ConnectionError::SessionExists(msg.player_id).into());
                }
                connections.insert(msg.player_id, msg.recipient.clone());
            }

            let mut game = game.lock().await;
            if game.is_over() {
                connections.lock().await.remove(&msg.player_id);
                return Err(StateError::GameAlreadyOver.into());
            }
            if let Err(error) = game.add_seat(msg.player_id, msg.name.clone()) {
                connections.lock().await.remove(&msg.player_id);
                return Err(error);
            }

            info!(
                game_id = %game_id,
                player = %msg.player_id,
                name = %msg.name,
                seats = game.seats().len(),
                "player joined"
            );
            let channel = RoomChannel::new(connections.lock().await.clone());
            channel.broadcast(GameEvent::PlayerJoined {
                player_id: msg.player_id,
                name: msg.name,
            });
            Ok(())
        })
    }
}

impl Handler<ClientDisconnected> for GameActor {
    type Result = ResponseFuture<()>;

    fn handle(&mut self, msg: ClientDisconnected, ctx: &mut Context<Self>) -> Self::Result {
        let game_id = self.game_id;
        let game = self.game.clone();
        let connections = self.connections.clone();
        let persister = self.persister.clone();
        let addr = ctx.address();

        Box::pin(async move {
            connections.lock().await.remove(&msg.player_id);

            let mut game = game.lock().await;
            let seat_index = match game.seat_index(msg.player_id) {
                Some(index) => index,
                None => return,
            };

            if !game.is_started() {
                game.remove_seat(msg.player_id);
                let channel = RoomChannel::new(connections.lock().await.clone());
                channel.broadcast(GameEvent::PlayerLeft {
                    player_id: msg.player_id,
                });
                return;
            }

            // A seated player dropping out of a running game ends it. The
            // in-flight turn, if any, has already been unblocked through
            // prompt cancellation and holds the game lock ahead of us.
            if !game.is_over() {
                let name = game.seat(seat_index).name.clone();
                warn!(game_id = %game_id, player = %msg.player_id, "player disconnected mid-game");
                game.finish(None);
                let channel = RoomChannel::new(connections.lock().await.clone());
                channel.broadcast(GameEvent::EndGame {
                    reason: format!("{} disconnected", name),
                    winner: None,
                });
                persister.persist(&game);
                addr.do_send(StopGame);
            }
        })
    }
}

impl Handler<StartGame> for GameActor {
    type Result = ResponseFuture<Result<(), GameError>>;

    fn handle(&mut self, msg: StartGame, _ctx: &mut Context<Self>) -> Self::Result {
        let game_id = self.game_id;
        let game = self.game.clone();
        let connections = self.connections.clone();
        let persister = self.persister.clone();

        Box::pin(async move {
            let channel = RoomChannel::new(connections.lock().await.clone());
            let mut game = game.lock().await;
            if game.is_over() {
                return Err(StateError::GameAlreadyOver.into());
            }
            if game.seat_index(msg.player_id).is_none() {
                return Err(ConnectionError::UnknownPlayer(msg.player_id).into());
            }
            game.start(&mut thread_rng())?;

            info!(game_id = %game_id, players = game.seats().len(), "game started");
            channel.broadcast(GameEvent::UpdateGameStatus { is_started: true });
            channel.broadcast(GameEvent::RemoveCardsFromDeck {
                count: STANDARD_DECK_SIZE - game.deck_len(),
            });
            if let Some(top) = game.pile_top() {
                info!(game_id = %game_id, starter = %top, "starter card dealt");
                channel.broadcast(GameEvent::AddCardRangeToPile { cards: vec![*top] });
            }
            for seat in game.seats() {
                channel.send_to(
                    seat.id,
                    GameEvent::AddCardRangeToHand {
                        cards: seat.hand.cards().to_vec(),
                    },
                );
                channel.send_others(
                    seat.id,
                    GameEvent::AddCardsToPlayerHand {
                        player_id: seat.id,
                        count: seat.hand.len(),
                    },
                );
            }
            channel.broadcast(GameEvent::UpdateTurn {
                index: game.current_turn(),
            });
            persister.persist(&game);
            Ok(())
        })
    }
}

impl Handler<StopGame> for GameActor {
    type Result = ();

    fn handle(&mut self, _msg: StopGame, ctx: &mut Context<Self>) {
        info!(game_id = %self.game_id, "shutting down game actor");
        ctx.stop();
    }
}
