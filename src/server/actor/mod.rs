use serde::{Deserialize, Serialize};

use crate::card::Card;

pub mod connection;

/// Everything a client may send over its WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum UserAction {
    StartGame,
    PerformTurn {
        cards: Vec<Card>,
    },
    /// Answers a pending card prompt on this connection.
    RequestCard {
        card: Card,
    },
    /// Answers a pending last-card prompt.
    SetLastCardStatus {
        is_last_card: bool,
    },
}
