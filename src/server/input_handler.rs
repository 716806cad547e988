use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    card::Card,
    enums::PROMPT_TIMEOUT,
    exception::{ConnectionError, GameError, StateError},
};

#[derive(Default)]
struct PendingPrompts {
    card: Option<oneshot::Sender<Card>>,
    last_card: Option<oneshot::Sender<bool>>,
}

impl PendingPrompts {
    fn is_empty(&self) -> bool {
        self.card.is_none() && self.last_card.is_none()
    }
}

/// Process-wide map from connection id to at most one outstanding prompt
/// of each kind. The orchestrator registers and awaits; connection actors
/// resolve answers and cancel on disconnect. Shared across all rooms.
#[derive(Clone, Default)]
pub struct PromptRegistry {
    state: Arc<Mutex<HashMap<Uuid, PendingPrompts>>>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any prompt is outstanding for this connection. Backs the
    /// anti-ukora rule: a prompted player cannot queue a new turn.
    pub fn has_pending(&self, conn: Uuid) -> bool {
        self.state
            .lock()
            .unwrap()
            .get(&conn)
            .map(|p| !p.is_empty())
            .unwrap_or(false)
    }

    fn register_card(&self, conn: Uuid) -> Result<oneshot::Receiver<Card>, GameError> {
        let mut state = self.state.lock().unwrap();
        let pending = state.entry(conn).or_default();
        if pending.card.is_some() {
            return Err(StateError::OutstandingPrompt.into());
        }
        let (tx, rx) = oneshot::channel();
        pending.card = Some(tx);
        Ok(rx)
    }

    fn register_last_card(&self, conn: Uuid) -> Result<oneshot::Receiver<bool>, GameError> {
        let mut state = self.state.lock().unwrap();
        let pending = state.entry(conn).or_default();
        if pending.last_card.is_some() {
            return Err(StateError::OutstandingPrompt.into());
        }
        let (tx, rx) = oneshot::channel();
        pending.last_card = Some(tx);
        Ok(rx)
    }

    /// Registers a card prompt and waits for the client's answer. A
    /// dropped connection or an expired [`PROMPT_TIMEOUT`] aborts with a
    /// connection error the caller turns into game termination.
    pub async fn await_card(&self, conn: Uuid) -> Result<Card, GameError> {
        let rx = self.register_card(conn)?;
        match tokio::time::timeout(Duration::from_secs(PROMPT_TIMEOUT), rx).await {
            Ok(Ok(card)) => Ok(card),
            Ok(Err(_)) => Err(ConnectionError::Disconnected.into()),
            Err(_) => {
                self.cancel(conn);
                Err(ConnectionError::PromptTimeout.into())
            }
        }
    }

    pub async fn await_last_card(&self, conn: Uuid) -> Result<bool, GameError> {
        let rx = self.register_last_card(conn)?;
        match tokio::time::timeout(Duration::from_secs(PROMPT_TIMEOUT), rx).await {
            Ok(Ok(answer)) => Ok(answer),
            Ok(Err(_)) => Err(ConnectionError::Disconnected.into()),
            Err(_) => {
                self.cancel(conn);
                Err(ConnectionError::PromptTimeout.into())
            }
        }
    }

    /// Completes a pending card prompt. A late or spurious answer is
    /// ignored.
    pub fn resolve_card_request(&self, conn: Uuid, card: Card) {
        let tx = self.state.lock().unwrap().get_mut(&conn).and_then(|p| p.card.take());
        match tx {
            Some(tx) => {
                let _ = tx.send(card);
            }
            None => debug!("ignoring card answer without a pending prompt from {}", conn),
        }
    }

    pub fn resolve_last_card(&self, conn: Uuid, is_last_card: bool) {
        let tx = self
            .state
            .lock()
            .unwrap()
            .get_mut(&conn)
            .and_then(|p| p.last_card.take());
        match tx {
            Some(tx) => {
                let _ = tx.send(is_last_card);
            }
            None => debug!(
                "ignoring last-card answer without a pending prompt from {}",
                conn
            ),
        }
    }

    /// Drops every pending prompt for a connection. Awaiting orchestration
    /// observes the dropped sender as a disconnect.
    pub fn cancel(&self, conn: Uuid) {
        if let Some(pending) = self.state.lock().unwrap().remove(&conn) {
            if !pending.is_empty() {
                warn!("cancelling outstanding prompts for connection {}", conn);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Face, Suit};

    #[tokio::test]
    async fn answer_resolves_pending_card_prompt() {
        let registry = PromptRegistry::new();
        let conn = Uuid::new_v4();
        let card = Card::new(Suit::Hearts, Face::Ace);

        let rx = registry.register_card(conn).unwrap();
        assert!(registry.has_pending(conn));
        registry.resolve_card_request(conn, card);
        assert_eq!(rx.await.unwrap(), card);
        assert!(!registry.has_pending(conn));
    }

    #[tokio::test]
    async fn second_prompt_of_same_kind_is_rejected() {
        let registry = PromptRegistry::new();
        let conn = Uuid::new_v4();

        let _rx = registry.register_card(conn).unwrap();
        assert!(registry.register_card(conn).is_err());
        // a different kind is still allowed
        assert!(registry.register_last_card(conn).is_ok());
    }

    #[tokio::test]
    async fn cancel_is_observed_as_disconnect() {
        let registry = PromptRegistry::new();
        let conn = Uuid::new_v4();

        let rx = registry.register_last_card(conn).unwrap();
        registry.cancel(conn);
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn spurious_answers_are_ignored() {
        let registry = PromptRegistry::new();
        let conn = Uuid::new_v4();
        registry.resolve_last_card(conn, true);
        registry.resolve_card_request(conn, Card::new(Suit::Clubs, Face::Nine));
        assert!(!registry.has_pending(conn));
    }
}
