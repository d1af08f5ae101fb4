//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("INPUT/{0}")]
    InvalidInput(String),

    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("CONFIG/IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("SERIALIZE/{0}")]
    SerializeError(String),
}

impl From<serde_yaml::Error> for DeckError {
    fn from(err: serde_yaml::Error) -> Self {
        DeckError::SerializeError(err.to_string())
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        DeckError::SerializeError(err.to_string())
    }
}
