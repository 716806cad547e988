//! In-crate helpers for the integration tests: an ephemeral-port server
//! and a small WebSocket client.

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use actix_web::{
    dev::ServerHandle,
    web::{self, Data},
    App, HttpServer,
};
use async_tungstenite::tungstenite::{self, http::Request, Message};
use ctor::ctor;
use futures::SinkExt;
use futures_util::StreamExt;
use uuid::Uuid;

use crate::{
    game::msg::GameEvent,
    server::{actor::UserAction, end_point::game, types::ServerState},
    setup_logger,
};

/// Binds the app on an ephemeral port and runs it in the background.
pub async fn spawn_server() -> (SocketAddr, Data<ServerState>, ServerHandle) {
    let state = web::Data::new(ServerState::new());
    let state_clone = state.clone();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(move || App::new().app_data(state.clone()).service(game))
        .listen(listener)
        .unwrap()
        .run();

    let handle = server.handle();
    tokio::spawn(server);

    (addr, state_clone, handle)
}

type WsStream =
    async_tungstenite::WebSocketStream<async_tungstenite::tokio::TokioAdapter<tokio::net::TcpStream>>;

pub struct WebSocketTest {
    pub stream: futures_util::stream::SplitStream<WsStream>,
    pub sink: futures_util::stream::SplitSink<WsStream, Message>,
}

impl WebSocketTest {
    /// Dials the room endpoint as the given player, speaking the same
    /// cookie identity the `AuthPlayer` extractor reads.
    pub async fn join_room(
        addr: SocketAddr,
        invite_link: &str,
        player_id: Uuid,
        player_name: &str,
    ) -> Result<Self, tungstenite::Error> {
        let host = addr.to_string();
        let request = Request::builder()
            .uri(format!("ws://{}/game/{}", host, invite_link))
            .header("Host", host)
            .header(
                "Cookie",
                format!("user_id={}; user_name={}", player_id, player_name),
            )
            .header("Upgrade", "websocket")
            .header("Connection", "Upgrade")
            .header(
                "Sec-WebSocket-Key",
                tungstenite::handshake::client::generate_key(),
            )
            .header("Sec-WebSocket-Version", "13")
            .body(())?;

        let (ws_stream, response) = async_tungstenite::tokio::connect_async(request).await?;
        assert_eq!(
            response.status(),
            tungstenite::http::StatusCode::SWITCHING_PROTOCOLS
        );

        let (sink, stream) = ws_stream.split();
        Ok(Self { stream, sink })
    }

    pub async fn send(&mut self, msg: impl Into<Message>) -> Result<(), tungstenite::Error> {
        self.sink.send(msg.into()).await
    }

    pub async fn send_action(&mut self, action: &UserAction) -> Result<(), tungstenite::Error> {
        let frame = serde_json::to_string(action).expect("serializable action");
        self.send(Message::Text(frame)).await
    }

    /// Reads frames until `filter` accepts one, answering pings along the
    /// way. Panics after ten seconds without a match.
    pub async fn expect_event<F, R>(&mut self, filter: F) -> R
    where
        F: Fn(GameEvent) -> Option<R>,
    {
        let recv = async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<GameEvent>(&text) {
                            Ok(event) => {
                                if let Some(extracted) = filter(event) {
                                    return extracted;
                                }
                            }
                            Err(_) => {
                                println!("skipping non-event frame: {}", text);
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if self.sink.send(Message::Pong(data)).await.is_err() {
                            panic!("failed to answer ping");
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        panic!("websocket closed while waiting for event: {:?}", reason);
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => panic!("websocket error: {:?}", e),
                    None => panic!("websocket stream ended unexpectedly"),
                }
            }
        };
        match tokio::time::timeout(Duration::from_secs(10), recv).await {
            Ok(result) => result,
            Err(_) => panic!("expected event not received within 10 seconds"),
        }
    }
}

#[ctor]
fn init() {
    setup_logger();
}
