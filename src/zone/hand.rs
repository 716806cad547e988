use crate::{
    card::Card,
    exception::{GameError, StateError},
};

/// One player's cards, as an unordered multiset. `is_last_card` remembers a
/// last-card declaration and is cleared whenever the player draws.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
    is_last_card: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            is_last_card: false,
        }
    }

    /// Takes drawn cards into the hand. Drawing voids any previous
    /// last-card declaration.
    pub fn add(&mut self, cards: Vec<Card>) {
        if !cards.is_empty() {
            self.is_last_card = false;
        }
        self.cards.extend(cards);
    }

    /// Multiset removal. Fails without removing anything if any of the
    /// given cards is not present often enough.
    pub fn remove(&mut self, cards: &[Card]) -> Result<(), GameError> {
        let mut taken = vec![false; self.cards.len()];
        for wanted in cards {
            let slot = self
                .cards
                .iter()
                .enumerate()
                .find(|(i, held)| !taken[*i] && *held == wanted);
            match slot {
                Some((i, _)) => taken[i] = true,
                None => return Err(GameError::State(StateError::CardsNotOwned)),
            }
        }
        let mut idx = 0;
        self.cards.retain(|_| {
            let keep = !taken[idx];
            idx += 1;
            keep
        });
        Ok(())
    }

    /// Whether the hand holds every given card, respecting multiplicity.
    pub fn contains_all(&self, cards: &[Card]) -> bool {
        let mut taken = vec![false; self.cards.len()];
        cards.iter().all(|wanted| {
            match self
                .cards
                .iter()
                .enumerate()
                .find(|(i, held)| !taken[*i] && *held == wanted)
            {
                Some((i, _)) => {
                    taken[i] = true;
                    true
                }
                None => false,
            }
        })
    }

    pub fn declare_last_card(&mut self) {
        self.is_last_card = true;
    }

    pub fn is_last_card(&self) -> bool {
        self.is_last_card
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
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
    use crate::card::{Face, Suit};

    #[test]
    fn remove_respects_multiplicity() {
        let six = Card::new(Suit::Hearts, Face::Six);
        let mut hand = Hand::new();
        hand.add(vec![six, six]);

        assert!(hand.contains_all(&[six, six]));
        assert!(!hand.contains_all(&[six, six, six]));

        hand.remove(&[six]).unwrap();
        assert_eq!(hand.len(), 1);
        assert!(hand.remove(&[six, six]).is_err());
        // failed removal leaves the hand untouched
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn drawing_clears_last_card_declaration() {
        let mut hand = Hand::new();
        hand.add(vec![Card::new(Suit::Hearts, Face::Six)]);
        hand.declare_last_card();
        assert!(hand.is_last_card());

        hand.add(vec![Card::new(Suit::Spades, Face::Nine)]);
        assert!(!hand.is_last_card());
    }
}
