use std::collections::HashMap;
use std::sync::Arc;

use actix::{Actor, Context, Recipient};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::server::input_handler::PromptRegistry;

pub mod msg;
pub mod persist;
pub mod state;
pub mod turn;

use msg::GameEvent;
use persist::Persist;
use state::Game;

/// One actor per room. The actor's mailbox receives player actions; the
/// game record itself lives behind an async mutex held for the duration
/// of a turn, so turn processing is strictly serialized per room while
/// unrelated rooms run concurrently.
pub struct GameActor {
    game_id: Uuid,
    invite_link: String,
    game: Arc<Mutex<Game>>,
    connections: Arc<Mutex<HashMap<Uuid, Recipient<GameEvent>>>>,
    prompts: PromptRegistry,
    persister: Arc<dyn Persist>,
}

impl GameActor {
    pub fn new(invite_link: String, prompts: PromptRegistry, persister: Arc<dyn Persist>) -> Self {
        Self {
            game_id: Uuid::new_v4(),
            invite_link,
            game: Arc::new(Mutex::new(Game::new())),
            connections: Arc::new(Mutex::new(HashMap::new())),
            prompts,
            persister,
        }
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }
}

impl Actor for GameActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(game_id = %self.game_id, invite_link = %self.invite_link, "game actor started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(game_id = %self.game_id, invite_link = %self.invite_link, "game actor stopped");
    }
}

/// A point-in-time view of the room's connections, cloned into turn
/// futures for broadcasting. Delivery is fire-and-forget; the transport
/// keeps per-recipient order.
#[derive(Clone, Default)]
pub struct RoomChannel {
    connections: HashMap<Uuid, Recipient<GameEvent>>,
}

impl RoomChannel {
    pub fn new(connections: HashMap<Uuid, Recipient<GameEvent>>) -> Self {
        Self { connections }
    }

    pub fn broadcast(&self, event: GameEvent) {
        for recipient in self.connections.values() {
            recipient.do_send(event.clone());
        }
    }

    pub fn send_to(&self, conn: Uuid, event: GameEvent) {
        if let Some(recipient) = self.connections.get(&conn) {
            recipient.do_send(event);
        }
    }

    pub fn send_others(&self, conn: Uuid, event: GameEvent) {
        for (id, recipient) in &self.connections {
            if *id != conn {
                recipient.do_send(event.clone());
            }
        }
    }
}
