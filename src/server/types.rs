use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix::{Actor, Addr};
use tracing::info;

use crate::{
    game::{
        persist::{Persist, TracingPersister},
        GameActor,
    },
    server::input_handler::PromptRegistry,
};

/// Process-wide state shared by every request: the room registry, the
/// prompt registry and the persistence hook.
pub struct ServerState {
    rooms: Mutex<HashMap<String, Addr<GameActor>>>,
    pub prompts: PromptRegistry,
    pub persister: Arc<dyn Persist>,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_persister(Arc::new(TracingPersister))
    }

    pub fn with_persister(persister: Arc<dyn Persist>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            prompts: PromptRegistry::new(),
            persister,
        }
    }

    /// Looks up the room's game actor, creating one for a new invite link
    /// or replacing an actor whose game has ended.
    pub fn room(&self, invite_link: &str) -> Addr<GameActor> {
        let mut rooms = self.rooms.lock().unwrap();
        if let Some(addr) = rooms.get(invite_link) {
            if addr.connected() {
                return addr.clone();
            }
        }
        info!(invite_link = %invite_link, "creating game room");
        let addr = GameActor::new(
            invite_link.to_string(),
            self.prompts.clone(),
            self.persister.clone(),
        )
        .start();
        rooms.insert(invite_link.to_string(), addr.clone());
        addr
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
