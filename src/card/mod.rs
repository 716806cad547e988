use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
    BlackJoker,
    RedJoker,
}

impl Suit {
    pub fn is_joker(self) -> bool {
        matches!(self, Suit::BlackJoker | Suit::RedJoker)
    }

    /// The four playable suits, without the joker pseudo-suits.
    pub fn standard() -> [Suit; 4] {
        [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Face {
    None,
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Face {
    /// Every face a non-joker card can carry.
    pub fn standard() -> [Face; 13] {
        [
            Face::Ace,
            Face::Two,
            Face::Three,
            Face::Four,
            Face::Five,
            Face::Six,
            Face::Seven,
            Face::Eight,
            Face::Nine,
            Face::Ten,
            Face::Jack,
            Face::Queen,
            Face::King,
        ]
    }
}

/// A single playing card. Jokers carry `Face::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub face: Face,
}

impl Card {
    pub fn new(suit: Suit, face: Face) -> Self {
        Self { suit, face }
    }

    pub fn is_joker(&self) -> bool {
        self.suit.is_joker()
    }

    /// A bomb forces the next player to draw unless countered.
    pub fn is_bomb(&self) -> bool {
        self.is_joker() || matches!(self.face, Face::Two | Face::Three)
    }

    /// Questions demand an answer card, otherwise the player draws one.
    pub fn is_question(&self) -> bool {
        matches!(self.face, Face::Eight | Face::Queen)
    }

    /// A card with no special effect. Only boring cards can close out a
    /// last-card win.
    pub fn is_boring(&self) -> bool {
        !self.is_bomb()
            && !self.is_question()
            && !matches!(self.face, Face::Ace | Face::Jack | Face::King)
    }

    /// How many cards this bomb makes the next player draw.
    pub fn pick_value(&self) -> u32 {
        if self.is_joker() {
            return 5;
        }
        match self.face {
            Face::Two => 2,
            Face::Three => 3,
            _ => 0,
        }
    }

    /// Request-cutting strength of an ace. The ace of spades counts double.
    pub fn ace_value(&self) -> u32 {
        match (self.suit, self.face) {
            (Suit::Spades, Face::Ace) => 2,
            (_, Face::Ace) => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Suit::BlackJoker => write!(f, "Black Joker"),
            Suit::RedJoker => write!(f, "Red Joker"),
            suit => write!(f, "{:?} of {:?}", self.face, suit),
        }
    }
}
