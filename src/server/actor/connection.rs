use std::time::{Duration, Instant};

use actix::{
    fut::wrap_future, Actor, ActorContext, ActorFutureExt, Addr, AsyncContext, Context, Handler,
    Running, StreamHandler,
};
use actix_ws::{CloseCode, CloseReason, Message, ProtocolError, Session};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    enums::{CLIENT_TIMEOUT, HEARTBEAT_INTERVAL},
    exception::GameError,
    game::{
        msg::{
            gameplay::PerformTurn,
            lifecycle::{ClientDisconnected, RegisterConnection, StartGame},
            GameEvent, MessageKind,
        },
        GameActor,
    },
    server::{actor::UserAction, input_handler::PromptRegistry},
};

/// One actor per WebSocket session. Parses client frames into
/// [`UserAction`]s, forwards commands to the room's game actor, resolves
/// prompt answers against the registry, and writes [`GameEvent`]s back to
/// the socket.
pub struct ConnectionActor {
    ws_session: Session,
    game_addr: Addr<GameActor>,
    prompts: PromptRegistry,
    player_id: Uuid,
    player_name: String,
    last_pong: Instant,
    cleanup_started: bool,
}

impl ConnectionActor {
    pub fn new(
        session: Session,
        game_addr: Addr<GameActor>,
        prompts: PromptRegistry,
        player_id: Uuid,
        player_name: String,
    ) -> Self {
        Self {
            ws_session: session,
            game_addr,
            prompts,
            player_id,
            player_name,
            last_pong: Instant::now(),
            cleanup_started: false,
        }
    }

    fn start_heartbeat_check(&self, ctx: &mut Context<Self>) {
        ctx.run_interval(Duration::from_secs(HEARTBEAT_INTERVAL), |act, ctx_inner| {
            if Instant::now().duration_since(act.last_pong) > Duration::from_secs(CLIENT_TIMEOUT) {
                warn!(
                    player = %act.player_id,
                    "heartbeat timeout, closing connection"
                );
                let session = act.ws_session.clone();
                ctx_inner.spawn(wrap_future::<_, Self>(async move {
                    let _ = session
                        .close(Some(CloseReason::from(CloseCode::Policy)))
                        .await;
                }));
                ctx_inner.stop();
                return;
            }

            let mut session = act.ws_session.clone();
            let player_id = act.player_id;
            ctx_inner.spawn(wrap_future::<_, Self>(async move {
                if let Err(e) = session.ping(b"heartbeat").await {
                    debug!(player = %player_id, "failed to send ping: {:?}", e);
                }
            }));
        });
    }

    fn register_with_game(&self, ctx: &mut Context<Self>) {
        let game_addr = self.game_addr.clone();
        let player_id = self.player_id;
        let name = self.player_name.clone();
        let recipient = ctx.address().recipient::<GameEvent>();
        let mut session = self.ws_session.clone();

        let register = async move {
            let failure = match game_addr
                .send(RegisterConnection {
                    player_id,
                    name,
                    recipient,
                })
                .await
            {
                Ok(Ok(())) => None,
                Ok(Err(error)) => Some(error.to_string()),
                Err(mailbox) => Some(GameError::from(mailbox).to_string()),
            };
            if let Some(reason) = &failure {
                let frame = serde_json::json!({ "error": reason }).to_string();
                let _ = session.text(frame).await;
            }
            failure.is_some()
        };
        ctx.spawn(wrap_future::<_, Self>(register).map(|rejected, act, ctx| {
            if rejected {
                warn!(player = %act.player_id, "room rejected the connection");
                ctx.stop();
            }
        }));
    }

    fn start_cleanup_task(&mut self) {
        if self.cleanup_started {
            return;
        }
        self.cleanup_started = true;

        let player_id = self.player_id;
        let session = self.ws_session.clone();
        tokio::spawn(async move {
            if let Err(e) = session.close(None).await {
                debug!(player = %player_id, "failed to close session: {:?}", e);
            }
        });
    }

    fn dispatch(&self, action: UserAction, ctx: &mut Context<Self>) {
        match action {
            UserAction::StartGame => self.forward_command(
                StartGame {
                    player_id: self.player_id,
                },
                false,
                ctx,
            ),
            UserAction::PerformTurn { cards } => self.forward_command(
                PerformTurn {
                    player_id: self.player_id,
                    cards,
                },
                true,
                ctx,
            ),
            UserAction::RequestCard { card } => {
                self.prompts.resolve_card_request(self.player_id, card)
            }
            UserAction::SetLastCardStatus { is_last_card } => {
                self.prompts.resolve_last_card(self.player_id, is_last_card)
            }
        }
    }

    /// Sends a command to the game actor and reflects a rejection back to
    /// this client as an error system message.
    fn forward_command<M>(&self, msg: M, is_turn: bool, ctx: &mut Context<Self>)
    where
        M: actix::Message<Result = Result<(), GameError>> + Send + 'static,
        GameActor: Handler<M>,
    {
        let game_addr = self.game_addr.clone();
        let self_addr = ctx.address();
        let player_id = self.player_id;

        ctx.spawn(wrap_future::<_, Self>(async move {
            match game_addr.send(msg).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    self_addr.do_send(GameEvent::ReceiveSystemMessage {
                        text: error.to_string(),
                        kind: MessageKind::Error,
                    });
                    if is_turn {
                        self_addr.do_send(GameEvent::NotifyTurnProcessed { valid: false });
                    }
                }
                Err(mailbox) => {
                    warn!(player = %player_id, "game actor unreachable: {:?}", mailbox);
                }
            }
        }));
    }
}

impl Actor for ConnectionActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Context<Self>) {
        info!(player = %self.player_id, name = %self.player_name, "connection established");
        self.start_heartbeat_check(ctx);
        self.register_with_game(ctx);
    }

    fn stopping(&mut self, _ctx: &mut Context<Self>) -> Running {
        info!(player = %self.player_id, "connection stopping");
        // Unblock any turn waiting on this player before the game actor
        // hears about the disconnect; its mailbox may be busy with that
        // very turn.
        self.prompts.cancel(self.player_id);
        self.game_addr.do_send(ClientDisconnected {
            player_id: self.player_id,
        });
        self.start_cleanup_task();
        Running::Stop
    }

    fn stopped(&mut self, _ctx: &mut Context<Self>) {
        debug!(player = %self.player_id, "connection actor stopped");
    }
}

impl StreamHandler<Result<Message, ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<Message, ProtocolError>, ctx: &mut Context<Self>) {
        match msg {
            Ok(Message::Ping(ping)) => {
                let mut session = self.ws_session.clone();
                ctx.spawn(wrap_future::<_, Self>(async move {
                    let _ = session.pong(&ping).await;
                }));
            }
            Ok(Message::Pong(_)) => {
                self.last_pong = Instant::now();
            }
            Ok(Message::Text(text)) => match serde_json::from_str::<UserAction>(&text) {
                Ok(action) => {
                    debug!(player = %self.player_id, ?action, "client action");
                    self.dispatch(action, ctx);
                }
                Err(e) => {
                    warn!(player = %self.player_id, "unparseable client frame: {}", e);
                    let frame =
                        serde_json::json!({ "error": format!("invalid message format: {}", e) })
                            .to_string();
                    let mut session = self.ws_session.clone();
                    ctx.spawn(wrap_future::<_, Self>(async move {
                        let _ = session.text(frame).await;
                    }));
                }
            },
            Ok(Message::Close(reason)) => {
                info!(player = %self.player_id, ?reason, "client closed the connection");
                ctx.stop();
            }
            Ok(_) => {}
            Err(e) => {
                error!(player = %self.player_id, "websocket error: {}", e);
                ctx.stop();
            }
        }
    }

    fn finished(&mut self, ctx: &mut Context<Self>) {
        info!(player = %self.player_id, "websocket stream finished");
        ctx.stop();
    }
}

impl Handler<GameEvent> for ConnectionActor {
    type Result = ();

    fn handle(&mut self, event: GameEvent, ctx: &mut Context<Self>) {
        match serde_json::to_string(&event) {
            Ok(frame) => {
                let mut session = self.ws_session.clone();
                let player_id = self.player_id;
                ctx.spawn(wrap_future::<_, Self>(async move {
                    if let Err(e) = session.text(frame).await {
                        debug!(player = %player_id, "failed to deliver event: {:?}", e);
                    }
                }));
            }
            Err(e) => {
                error!(player = %self.player_id, "failed to serialize event: {}", e);
            }
        }
    }
}
