/// Seconds between server heartbeat pings.
pub const HEARTBEAT_INTERVAL: u64 = 5;
/// Seconds without a pong before the connection is dropped.
pub const CLIENT_TIMEOUT: u64 = 20;
/// Seconds the acting player gets to answer an in-turn prompt.
pub const PROMPT_TIMEOUT: u64 = 60;

pub const STANDARD_DECK_SIZE: usize = 54;
pub const STARTING_HAND_SIZE: usize = 4;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
