use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    card::{Card, Face, Suit},
    exception::{GameError, StateError},
};

/// The draw pile. Last element is the top card.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// All 52 suit/face combinations plus the two jokers, in unspecified
    /// order. Callers shuffle before dealing.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(crate::enums::STANDARD_DECK_SIZE);
        for suit in Suit::standard() {
            for face in Face::standard() {
                cards.push(Card::new(suit, face));
            }
        }
        cards.push(Card::new(Suit::BlackJoker, Face::None));
        cards.push(Card::new(Suit::RedJoker, Face::None));
        Self { cards }
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Pops the top card.
    pub fn deal(&mut self) -> Result<Card, GameError> {
        self.cards
            .pop()
            .ok_or(GameError::State(StateError::EmptyZone { zone: "deck" }))
    }

    /// Pops `n` cards, top first. Fails without dealing anything if fewer
    /// than `n` remain.
    pub fn deal_many(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if self.cards.len() < n {
            return Err(GameError::State(StateError::EmptyZone { zone: "deck" }));
        }
        let mut dealt = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(card) = self.cards.pop() {
                dealt.push(card);
            }
        }
        Ok(dealt)
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_deck_has_54_cards_and_two_jokers() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), 54);
        let jokers = deck.cards.iter().filter(|c| c.is_joker()).count();
        assert_eq!(jokers, 2);
    }

    #[test]
    fn deal_many_is_all_or_nothing() {
        let mut deck = Deck::new();
        deck.push(Card::new(Suit::Hearts, Face::Four));
        assert!(deck.deal_many(2).is_err());
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.deal_many(1).unwrap().len(), 1);
        assert!(deck.is_empty());
    }

    #[test]
    fn deal_pops_most_recently_pushed() {
        let mut deck = Deck::new();
        deck.push(Card::new(Suit::Hearts, Face::Four));
        deck.push(Card::new(Suit::Spades, Face::Nine));
        assert_eq!(deck.deal().unwrap(), Card::new(Suit::Spades, Face::Nine));
    }
}
