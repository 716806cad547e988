use tracing::debug;

use super::state::Game;

/// Storage hook invoked after every state-changing step of a turn. The
/// storage format is the collaborator's concern.
pub trait Persist: Send + Sync {
    fn persist(&self, game: &Game);
}

/// Default persister: logs a snapshot summary instead of writing anywhere.
pub struct TracingPersister;

impl Persist for TracingPersister {
    fn persist(&self, game: &Game) {
        debug!(
            deck = game.deck_len(),
            pile = game.pile_len(),
            turn = game.current_turn(),
            turns_played = game.turns().len(),
            "game snapshot persisted"
        );
    }
}
