use crate::core::types::CharacterId;
use thiserror::Error;

/// Failure to retrieve one character record from the attribute source.
///
/// Every variant is treated as transient by the roster builder and retried
/// until the attempt budget runs out.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Source answered with HTTP status {0}")]
    Status(u16),

    #[error("Source rejected character {id}: {reason}")]
    Rejected { id: CharacterId, reason: String },

    #[error("Malformed character payload: {0}")]
    Malformed(String),

    #[error("Character {0} not found")]
    NotFound(CharacterId),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(err.to_string()),
        }
    }
}

/// A team could not be filled with unique, fully derived members
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Could not fetch character {id} after {attempts} attempts: {source}")]
    FetchExhausted {
        id: CharacterId,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("Character id space of {available} ids cannot supply {needed} unique members")]
    IdSpaceExhausted { available: usize, needed: usize },
}

/// Battle log text does not follow the line templates
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Battle log is empty")]
    Empty,

    #[error("Battle log is missing its {0} line")]
    MissingLine(&'static str),

    #[error("Line {line}: expected {expected}, found {found:?}")]
    Malformed {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Line {line}: round {found} out of order (expected {expected})")]
    RoundOutOfOrder { line: usize, expected: u32, found: u32 },

    #[error("Winning team {0:?} is not one of the announced teams")]
    UnknownWinner(String),
}

/// The report channel could not deliver the battle report
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Report channel is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Could not reach report channel: {0}")]
    Transport(String),

    #[error("Report channel rejected the message with HTTP status {0}")]
    Rejected(u16),
}

/// Battle log sink failures
#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Battle log entry out of order: {0}")]
    OutOfOrder(&'static str),

    #[error("Cannot log {role} name {name:?}: {reason}")]
    UnloggableName {
        role: &'static str,
        name: String,
        reason: &'static str,
    },
}

/// Configuration could not be loaded or is inconsistent
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Team assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Battle log decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Report delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Battle log error: {0}")]
    Log(#[from] LogError),

    #[error("Team {0} has no members to fight with")]
    EmptyTeam(String),

    #[error("Round {round}: neither {attacker} nor {defender} can deal damage")]
    Stalemate {
        round: u32,
        attacker: String,
        defender: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
