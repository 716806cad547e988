//! The rule engine. A pure function over a table snapshot and a played
//! card sequence, producing either a [`TurnError`] or a [`Delta`] the
//! orchestrator applies to the game. Performs no I/O and no mutation.

pub mod delta;

use crate::{
    card::{Card, Face},
    exception::TurnError,
};

pub use delta::{Delta, RequestLevel};

/// The slice of game state the engine reads: the pile top, the live pick
/// counter and the outstanding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub top: Card,
    pub pick: u32,
    pub request: Option<Card>,
    pub request_level: RequestLevel,
}

/// Validates the sequence and produces its delta.
pub fn evaluate(snapshot: &Snapshot, cards: &[Card]) -> Result<Delta, TurnError> {
    if cards.is_empty() {
        return Ok(Delta::empty_turn(snapshot.pick));
    }
    validate(snapshot, cards)?;
    Ok(delta::generate(snapshot, cards))
}

/// Checks a sequence against the table. Total over any input: an empty
/// play is always legal, and every rejection is one of the closed set in
/// [`TurnError`].
pub fn validate(snapshot: &Snapshot, cards: &[Card]) -> Result<(), TurnError> {
    let Some(first) = cards.first() else {
        return Ok(());
    };
    let top = &snapshot.top;

    // An outstanding request binds the first card unless it is an ace.
    if let Some(request) = &snapshot.request {
        if first.face != Face::Ace {
            let face_ok = snapshot.request_level != RequestLevel::CardRequest
                || first.face == request.face;
            if !face_ok || first.suit != request.suit {
                return Err(TurnError::CardRequested);
            }
        }
    }

    // A live bomb on the pile must be countered in kind.
    if top.is_bomb() && snapshot.pick > 0 && first.face != Face::Ace {
        let counters = if top.is_joker() {
            first.is_joker()
        } else {
            first.is_bomb()
        };
        if !counters {
            return Err(TurnError::DrawCards);
        }
    }

    let first_matches_top = first.face == Face::Ace
        || first.is_joker()
        || top.face == Face::Ace
        || top.is_joker()
        || first.face == top.face
        || first.suit == top.suit;
    if !first_matches_top {
        return Err(TurnError::InvalidFirstCard);
    }

    for pair in cards.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if cur.face == Face::Ace {
            if !(prev.is_question() || prev.face == Face::Ace) {
                return Err(TurnError::SubsequentAceOrJoker);
            }
        } else if cur.is_joker() {
            if !(prev.is_question() || prev.is_joker()) {
                return Err(TurnError::SubsequentAceOrJoker);
            }
        } else if prev.is_question() {
            // A question's answer may switch suit, unlike plain chaining.
            if cur.face != prev.face && cur.suit != prev.suit {
                return Err(TurnError::InvalidAnswer);
            }
        } else if cur.face != prev.face {
            return Err(TurnError::InvalidCardSequence);
        }
    }

    Ok(())
}
