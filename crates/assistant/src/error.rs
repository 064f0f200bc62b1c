//! The module contains the errors the assistant can throw.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("invalid api key: {0}")]
    InvalidKey(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("unreadable reply: {0}")]
    MalformedReply(String),
}
