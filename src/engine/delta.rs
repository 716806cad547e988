use serde::{Deserialize, Serialize};

use crate::card::{Card, Face};

use super::Snapshot;

/// Strength of the demand an ace places on the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestLevel {
    #[default]
    NoRequest,
    SuitRequest,
    CardRequest,
}

impl RequestLevel {
    pub fn depth(self) -> u32 {
        match self {
            RequestLevel::NoRequest => 0,
            RequestLevel::SuitRequest => 1,
            RequestLevel::CardRequest => 2,
        }
    }
}

/// The structured effect of a validated turn. Produced by the engine,
/// applied by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub cards: Vec<Card>,
    /// Cards the acting player must now draw.
    pub pick: u32,
    /// Cards the next player will owe.
    pub give: u32,
    /// How many seats to advance. Zero means the player goes again.
    pub skip: u32,
    /// Flip the direction of play before advancing.
    pub reverse: bool,
    pub request_level: RequestLevel,
    /// How many levels of the outstanding request this turn discharges.
    pub remove_request_levels: u32,
}

impl Delta {
    fn defaults(cards: &[Card]) -> Self {
        Self {
            cards: cards.to_vec(),
            pick: 0,
            give: 0,
            skip: 1,
            reverse: false,
            request_level: RequestLevel::NoRequest,
            remove_request_levels: 0,
        }
    }

    /// A pass: draw the owed cards, or one card when nothing is owed. An
    /// outstanding request stays on the table.
    pub fn empty_turn(owed: u32) -> Self {
        Self {
            pick: owed.max(1),
            ..Self::defaults(&[])
        }
    }
}

/// Computes the delta of an already validated, non-empty sequence.
pub fn generate(snapshot: &Snapshot, cards: &[Card]) -> Delta {
    let mut delta = Delta::defaults(cards);

    for card in cards {
        match card.face {
            Face::Jack => delta.skip += 1,
            Face::King => delta.reverse = !delta.reverse,
            _ => {}
        }
    }

    // An even number of kings bounces the turn back to the player.
    let kings = cards.iter().filter(|c| c.face == Face::King).count();
    if kings > 0 && kings % 2 == 0 {
        delta.skip = 0;
    }

    let last = &cards[cards.len() - 1];
    if last.is_question() {
        delta.pick = 1;
        return delta;
    }
    if last.is_bomb() {
        delta.give = last.pick_value();
        return delta;
    }
    if last.face == Face::Ace {
        let mut aces: u32 = cards.iter().map(|c| c.ace_value()).sum();
        let level = snapshot.request_level.depth();
        delta.remove_request_levels = aces.min(level);
        aces = aces.saturating_sub(level);
        if snapshot.pick > 0 {
            // One ace is spent shielding against the owed cards.
            aces = aces.saturating_sub(1);
        }
        if aces > 1 {
            delta.request_level = RequestLevel::CardRequest;
        } else if aces == 1 {
            delta.request_level = RequestLevel::SuitRequest;
        }
    }

    delta
}
