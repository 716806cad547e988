use std::{future::Future, pin::Pin};

use actix::{Actor, AsyncContext, Context};
use actix_web::{get, web, FromRequest, HttpRequest, HttpResponse};
use actix_ws::handle;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    exception::{ConnectionError, GameError},
    server::{actor::connection::ConnectionActor, types::ServerState},
};

/// Player identity carried by cookies. Authentication proper lives with
/// an external collaborator; this server trusts the `user_id` cookie.
#[derive(Debug, Clone)]
pub struct AuthPlayer {
    pub id: Uuid,
    pub name: String,
}

impl FromRequest for AuthPlayer {
    type Error = GameError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let Some(id_cookie) = req.cookie("user_id") else {
                warn!("missing 'user_id' cookie");
                return Err(ConnectionError::CookieNotFound.into());
            };
            let id = Uuid::parse_str(id_cookie.value()).map_err(|e| {
                warn!("failed to parse player id from cookie: {}", e);
                GameError::Connection(ConnectionError::InvalidPayload(format!(
                    "bad user_id cookie: {}",
                    e
                )))
            })?;
            let name = req
                .cookie("user_name")
                .map(|c| c.value().to_string())
                .unwrap_or_else(|| format!("player-{}", &id.to_string()[..8]));
            Ok(AuthPlayer { id, name })
        })
    }
}

/// WebSocket entry point for a room. Upgrades the connection and hands
/// the session to a fresh connection actor bound to the room's game.
#[get("/game/{invite_link}")]
#[instrument(skip(state, req, payload), fields(player = %player.id))]
pub async fn game(
    player: AuthPlayer,
    invite_link: web::Path<String>,
    state: web::Data<ServerState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, GameError> {
    let invite_link = invite_link.into_inner();
    let game_addr = state.room(&invite_link);

    let (response, session, message_stream) = match handle(&req, payload) {
        Ok(upgraded) => {
            info!(invite_link = %invite_link, "websocket handshake successful");
            upgraded
        }
        Err(e) => {
            error!(invite_link = %invite_link, "websocket handshake failed: {:?}", e);
            return Ok(HttpResponse::InternalServerError().body(format!("WS handshake error: {}", e)));
        }
    };

    ConnectionActor::create(|ctx: &mut Context<ConnectionActor>| {
        ctx.add_stream(message_stream);
        ConnectionActor::new(
            session,
            game_addr,
            state.prompts.clone(),
            player.id,
            player.name,
        )
    });

    Ok(response)
}
