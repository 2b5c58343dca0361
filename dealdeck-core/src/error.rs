use thiserror::Error;

/// Failure of a single request against the deals API.
///
/// Covers network failures, non-2xx responses and undecodable bodies alike;
/// callers never need to tell them apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("request to {url} failed: {reason}")]
pub struct TransportError {
    pub url: String,
    pub reason: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DealsError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DealsError>;
