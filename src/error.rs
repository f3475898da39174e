//! Error types for block building and mining

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid difficulty target: {0}")]
    InvalidTarget(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Mining aborted after {attempts} attempts")]
    MiningAborted { attempts: u64 },

    #[error("Mining exhausted the nonce space without a solution")]
    MiningExhausted,

    #[error("Mining failed: {0}")]
    Mining(String),
}

impl From<serde_json::Error> for BuilderError {
    fn from(err: serde_json::Error) -> Self {
        BuilderError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BuilderError>;
