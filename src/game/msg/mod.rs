pub mod gameplay;
pub mod lifecycle;

use actix::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// Everything the server pushes to clients. Delivered to connection
/// actors, which serialize each event as one JSON text frame.
#[derive(Debug, Clone, Message, Serialize, Deserialize)]
#[rtype(result = "()")]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    PlayerJoined {
        player_id: Uuid,
        name: String,
    },
    PlayerLeft {
        player_id: Uuid,
    },
    UpdateGameStatus {
        is_started: bool,
    },
    AddCardRangeToPile {
        cards: Vec<Card>,
    },
    RemoveCardsFromDeck {
        count: usize,
    },
    AddCardsToDeck {
        count: usize,
    },
    ReclaimPile,
    /// Targeted at the drawing player; everyone else sees the counted
    /// variant below.
    AddCardRangeToHand {
        cards: Vec<Card>,
    },
    RemoveCardRangeFromHand {
        cards: Vec<Card>,
    },
    AddCardsToPlayerHand {
        player_id: Uuid,
        count: usize,
    },
    RemoveCardsFromPlayerHand {
        player_id: Uuid,
        count: usize,
    },
    SetCurrentRequest {
        card: Option<Card>,
    },
    UpdateTurn {
        index: usize,
    },
    /// Asks the acting player for a card; `specific` demands suit and
    /// face, otherwise only the suit is taken.
    PromptCardRequest {
        specific: bool,
    },
    PromptLastCardRequest,
    NotifyTurnProcessed {
        valid: bool,
    },
    ReceiveSystemMessage {
        text: String,
        kind: MessageKind,
    },
    EndGame {
        reason: String,
        winner: Option<Uuid>,
    },
}
