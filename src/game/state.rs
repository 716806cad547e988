use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    card::{Card, Face},
    engine::{RequestLevel, Snapshot},
    enums::{MAX_PLAYERS, MIN_PLAYERS, STARTING_HAND_SIZE},
    exception::{ConnectionError, GameError, StateError},
    zone::{Deck, Hand, Pile},
};

/// One joined player: identity plus their hand.
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: Uuid,
    pub name: String,
    pub hand: Hand,
}

/// One processed turn, kept on the game's log.
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub player: Uuid,
    pub cards: Vec<Card>,
    pub request: Option<Card>,
    pub at: DateTime<Utc>,
}

/// The authoritative record of a single game. Mutated only by its game
/// actor; every mutator keeps the 54-card conservation invariant.
#[derive(Debug, Clone, Default)]
pub struct Game {
    deck: Deck,
    pile: Pile,
    seats: Vec<Seat>,
    current_turn: usize,
    is_forward: bool,
    give: u32,
    pick: u32,
    current_request: Option<Card>,
    request_level: RequestLevel,
    is_started: bool,
    is_over: bool,
    winner: Option<Uuid>,
    turns: Vec<TurnRecord>,
}

impl Game {
    pub fn new() -> Self {
        Self {
            is_forward: true,
            ..Self::default()
        }
    }

    // ---- seating -------------------------------------------------------

    pub fn add_seat(&mut self, id: Uuid, name: String) -> Result<usize, GameError> {
        if self.is_started {
            return Err(StateError::AlreadyStarted.into());
        }
        if self.seats.len() >= MAX_PLAYERS {
            return Err(StateError::GameFull.into());
        }
        if self.seats.iter().any(|s| s.id == id) {
            return Err(ConnectionError::SessionExists(id).into());
        }
        self.seats.push(Seat {
            id,
            name,
            hand: Hand::new(),
        });
        Ok(self.seats.len() - 1)
    }

    pub fn remove_seat(&mut self, id: Uuid) -> bool {
        let before = self.seats.len();
        self.seats.retain(|s| s.id != id);
        self.seats.len() != before
    }

    pub fn seat_index(&self, id: Uuid) -> Option<usize> {
        self.seats.iter().position(|s| s.id == id)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, index: usize) -> &Seat {
        &self.seats[index]
    }

    pub fn hand_mut(&mut self, index: usize) -> &mut Hand {
        &mut self.seats[index].hand
    }

    // ---- lifecycle -----------------------------------------------------

    /// Shuffles a fresh standard deck, deals a boring starter card to the
    /// pile (pushing a non-boring candidate back and reshuffling), then
    /// deals the starting hands.
    pub fn start<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if self.is_started {
            return Err(StateError::AlreadyStarted.into());
        }
        if self.seats.len() < MIN_PLAYERS {
            return Err(StateError::NotEnoughPlayers.into());
        }

        let mut deck = Deck::standard();
        deck.shuffle(rng);
        loop {
            let candidate = deck.deal()?;
            if candidate.is_boring() {
                self.pile.push(candidate);
                break;
            }
            deck.push(candidate);
            deck.shuffle(rng);
        }
        for seat in &mut self.seats {
            seat.hand.add(deck.deal_many(STARTING_HAND_SIZE)?);
        }

        self.deck = deck;
        self.current_turn = 0;
        self.is_forward = true;
        self.give = 0;
        self.pick = 0;
        self.current_request = None;
        self.request_level = RequestLevel::NoRequest;
        self.is_started = true;
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Marks the game terminated, with or without a winner.
    pub fn finish(&mut self, winner: Option<Uuid>) {
        self.is_over = true;
        self.winner = winner;
    }

    pub fn winner(&self) -> Option<Uuid> {
        self.winner
    }

    // ---- engine view ---------------------------------------------------

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.pile.top().map(|top| Snapshot {
            top: *top,
            pick: self.pick,
            request: self.current_request,
            request_level: self.request_level,
        })
    }

    // ---- counters and request ------------------------------------------

    /// Turns last turn's debt into this player's problem: `pick <- give`,
    /// `give <- 0`. Returns the previous values for the rejection path.
    pub fn roll_counters(&mut self) -> (u32, u32) {
        let previous = (self.pick, self.give);
        self.pick = self.give;
        self.give = 0;
        previous
    }

    pub fn restore_counters(&mut self, pick: u32, give: u32) {
        self.pick = pick;
        self.give = give;
    }

    pub fn set_counters(&mut self, pick: u32, give: u32) {
        self.pick = pick;
        self.give = give;
    }

    pub fn pick(&self) -> u32 {
        self.pick
    }

    pub fn give(&self) -> u32 {
        self.give
    }

    /// Stores a request. A card with `Face::None` is a suit-only request;
    /// `None` clears the demand.
    pub fn set_request(&mut self, request: Option<Card>) {
        self.request_level = match &request {
            None => RequestLevel::NoRequest,
            Some(card) if card.face == Face::None => RequestLevel::SuitRequest,
            Some(_) => RequestLevel::CardRequest,
        };
        self.current_request = request;
    }

    pub fn current_request(&self) -> Option<Card> {
        self.current_request
    }

    pub fn request_level(&self) -> RequestLevel {
        self.request_level
    }

    // ---- zones ---------------------------------------------------------

    pub fn push_to_pile(&mut self, card: Card) {
        self.pile.push(card);
    }

    pub fn reclaim_pile(&mut self) -> Result<Vec<Card>, GameError> {
        self.pile.reclaim()
    }

    pub fn push_to_deck(&mut self, card: Card) {
        self.deck.push(card);
    }

    pub fn shuffle_deck<R: Rng>(&mut self, rng: &mut R) {
        self.deck.shuffle(rng);
    }

    pub fn deal_one(&mut self) -> Result<Card, GameError> {
        self.deck.deal()
    }

    pub fn try_deal_many(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        self.deck.deal_many(n)
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn pile_len(&self) -> usize {
        self.pile.len()
    }

    pub fn pile_top(&self) -> Option<&Card> {
        self.pile.top()
    }

    // ---- turn order ----------------------------------------------------

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn is_forward(&self) -> bool {
        self.is_forward
    }

    pub fn set_direction_forward(&mut self, forward: bool) {
        self.is_forward = forward;
    }

    /// Moves the turn index one seat at a time, honoring direction.
    pub fn advance_turn(&mut self, skip: u32) {
        let n = self.seats.len() as isize;
        if n == 0 {
            return;
        }
        let step: isize = if self.is_forward { 1 } else { -1 };
        let mut index = self.current_turn as isize;
        for _ in 0..skip {
            index = (index + step).rem_euclid(n);
        }
        self.current_turn = index as usize;
    }

    // ---- bookkeeping ---------------------------------------------------

    pub fn record_turn(&mut self, record: TurnRecord) {
        self.turns.push(record);
    }

    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    /// Total cards across deck, pile and hands. 54 at every observable
    /// point once the game has started.
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.pile.len()
            + self.seats.iter().map(|s| s.hand.len()).sum::<usize>()
    }
}
