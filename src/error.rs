use std::path::PathBuf;

use crate::game::Player;
use crate::net::protocol::StatusCode;

/// A rejected move attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("it is not {player}'s turn ({to_move} to move)")]
    WrongTurn { player: Player, to_move: Player },

    #[error("column {0} is out of range")]
    OutOfRange(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Failures inside the move search. The tree-search agent logs these and
/// falls back to a default move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("interior node at depth {depth} has no legal children")]
    NoChildren { depth: u32 },

    #[error("search worker stopped before reporting a result")]
    WorkerLost,
}

/// Errors decoding or exchanging protocol frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame too short: expected {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("unknown request type {0:#04x}")]
    UnknownRequestType(u8),

    #[error("unknown response type {0:#04x}")]
    UnknownResponseType(u8),

    #[error("unknown status code {0:#04x}")]
    UnknownStatus(u8),

    #[error("invalid player byte {0}")]
    InvalidPlayer(u8),

    #[error("invalid cell byte {value} at offset {offset}")]
    InvalidCell { offset: usize, value: u8 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors seen by a client talking to the game server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("server rejected request: {0:?}")]
    Rejected(StatusCode),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
