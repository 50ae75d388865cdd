use thiserror::Error;

use crate::types::Topic;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("No data for topic: {0}")]
    NoDataForTopic(Topic),

    #[error("Filter selection failed: {0}")]
    SelectionFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Wallet error: {0}")]
    Wallet(String),
}

pub type Result<T> = std::result::Result<T, Error>;
