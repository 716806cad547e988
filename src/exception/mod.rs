use std::fmt;

use actix::MailboxError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use uuid::Uuid;

/// Rule violations reported by the engine. Closed set: every rejected
/// card sequence maps to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    CardRequested,
    DrawCards,
    InvalidFirstCard,
    SubsequentAceOrJoker,
    InvalidAnswer,
    InvalidCardSequence,
}

impl TurnError {
    /// Text shown to the player in the error system message.
    pub fn player_message(&self) -> &'static str {
        match self {
            TurnError::CardRequested => "You must honor the requested card",
            TurnError::DrawCards => "You must counter the bomb or draw your cards",
            TurnError::InvalidFirstCard => "That card cannot be played on the pile",
            TurnError::SubsequentAceOrJoker => {
                "An ace or joker can only follow a question, an ace or a joker"
            }
            TurnError::InvalidAnswer => "That card does not answer the question",
            TurnError::InvalidCardSequence => "Those cards do not chain together",
        }
    }
}

/// Game state and turn ordering errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    NotStarted,
    AlreadyStarted,
    NotYourTurn,
    OutstandingPrompt,
    CardsNotOwned,
    GameFull,
    NotEnoughPlayers,
    GameAlreadyOver,
    EmptyZone { zone: &'static str },
}

/// Client connection and prompt correlation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    SessionExists(Uuid),
    UnknownPlayer(Uuid),
    Disconnected,
    PromptTimeout,
    CookieNotFound,
    InvalidPayload(String),
}

/// Process level failures (I/O, serialization, actor plumbing).
#[derive(Debug)]
pub enum SystemError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Mailbox(MailboxError),
    Internal(String),
}

#[derive(Debug)]
pub enum GameError {
    Turn(TurnError),
    State(StateError),
    Connection(ConnectionError),
    System(SystemError),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::CardRequested => write!(f, "first card does not honor the current request"),
            TurnError::DrawCards => write!(f, "a live bomb must be countered or drawn"),
            TurnError::InvalidFirstCard => write!(f, "first card does not match the pile top"),
            TurnError::SubsequentAceOrJoker => {
                write!(f, "ace or joker played after an incompatible card")
            }
            TurnError::InvalidAnswer => write!(f, "answer does not match the question card"),
            TurnError::InvalidCardSequence => write!(f, "cards in the sequence do not share a face"),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NotStarted => write!(f, "the game has not started yet"),
            StateError::AlreadyStarted => write!(f, "the game has already started"),
            StateError::NotYourTurn => write!(f, "it is not this player's turn"),
            StateError::OutstandingPrompt => {
                write!(f, "a prompt answer is still pending for this player")
            }
            StateError::CardsNotOwned => write!(f, "player does not hold all the played cards"),
            StateError::GameFull => write!(f, "the room already has the maximum number of players"),
            StateError::NotEnoughPlayers => write!(f, "not enough players to start the game"),
            StateError::GameAlreadyOver => write!(f, "the game is already over"),
            StateError::EmptyZone { zone } => write!(f, "no cards left in {}", zone),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::SessionExists(id) => {
                write!(f, "an active session already exists for player {}", id)
            }
            ConnectionError::UnknownPlayer(id) => write!(f, "player {} is not in this room", id),
            ConnectionError::Disconnected => write!(f, "the player disconnected"),
            ConnectionError::PromptTimeout => write!(f, "the player did not answer in time"),
            ConnectionError::CookieNotFound => write!(f, "missing 'user_id' cookie"),
            ConnectionError::InvalidPayload(reason) => {
                write!(f, "invalid payload from client: {}", reason)
            }
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::Io(e) => write!(f, "I/O error: {}", e),
            SystemError::Json(e) => write!(f, "JSON processing error: {}", e),
            SystemError::Mailbox(e) => write!(f, "actor mailbox error: {}", e),
            SystemError::Internal(msg) => write!(f, "internal server error: {}", msg),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Turn(e) => e.fmt(f),
            GameError::State(e) => e.fmt(f),
            GameError::Connection(e) => e.fmt(f),
            GameError::System(e) => e.fmt(f),
        }
    }
}

impl ResponseError for GameError {
    fn status_code(&self) -> StatusCode {
        match self {
            GameError::System(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GameError::Turn(_) => StatusCode::BAD_REQUEST,
            GameError::State(_) => StatusCode::CONFLICT,
            GameError::Connection(ConnectionError::CookieNotFound) => StatusCode::UNAUTHORIZED,
            GameError::Connection(ConnectionError::SessionExists(_)) => StatusCode::CONFLICT,
            GameError::Connection(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();

        let client_message = if status.is_server_error() {
            "an internal server error occurred".to_string()
        } else {
            message.clone()
        };

        tracing::error!("request failed: {}", message);

        HttpResponse::build(status).json(serde_json::json!({ "error": client_message }))
    }
}

impl From<TurnError> for GameError {
    fn from(e: TurnError) -> Self {
        GameError::Turn(e)
    }
}

impl From<StateError> for GameError {
    fn from(e: StateError) -> Self {
        GameError::State(e)
    }
}

impl From<ConnectionError> for GameError {
    fn from(e: ConnectionError) -> Self {
        GameError::Connection(e)
    }
}

impl From<SystemError> for GameError {
    fn from(e: SystemError) -> Self {
        GameError::System(e)
    }
}

impl From<MailboxError> for GameError {
    fn from(e: MailboxError) -> Self {
        GameError::System(SystemError::Mailbox(e))
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::System(SystemError::Json(e))
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::System(SystemError::Io(e))
    }
}
