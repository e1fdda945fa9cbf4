use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API call to {url} returned non-success status {status}")]
    Api { url: String, status: StatusCode },

    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse amount {value:?} of message {message_id}")]
    Parse { message_id: String, value: String },

    #[error("unknown transfer type {kind:?} of message {message_id}")]
    UnknownType { message_id: String, kind: String },

    #[error("transfer {0} is missing an amount record")]
    IncompleteTransfer(String),

    #[error("timestamp {timestamp} of message {message_id} is out of range")]
    InvalidTimestamp { message_id: String, timestamp: i64 },

    #[error("failed to write ledger CSV")]
    Write(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
