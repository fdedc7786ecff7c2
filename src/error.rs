//! Error types for store actions.
//!
//! Failures fall into two coarse kinds: the request never produced a usable
//! response ([`ErrorKind::Network`]), or it did but the body could not be used
//! ([`ErrorKind::DataFormat`]).

use thiserror::Error;

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable response arrived: request rejected, unreachable, answered
    /// with a non-success status, or its task died or never started
    Network,
    /// Response body missing, unparseable, falsy, or reported as an error
    DataFormat,
}

/// Errors raised by collaborators and surfaced by store actions.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The HTTP request itself failed
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// A non-HTTP transport failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The body could not be parsed into the expected shape
    #[error("Invalid {resource} data: {reason}")]
    DataFormat { resource: String, reason: String },

    /// The body parsed to a falsy JSON value
    #[error("Empty {resource} data")]
    EmptyPayload { resource: String },

    /// The GraphQL endpoint reported errors
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// A spawned action panicked or was cancelled before reporting
    #[error("Background task failed: {0}")]
    TaskFailed(String),

    /// An action that spawns tasks was started outside a tokio runtime
    #[error("No tokio runtime: {0}")]
    NoRuntime(String),
}

impl StoreError {
    /// Build a [`StoreError::DataFormat`] from anything displayable.
    pub fn data_format(resource: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        StoreError::DataFormat {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// Which of the two failure kinds this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Network { .. }
            | StoreError::Status { .. }
            | StoreError::Transport(_)
            | StoreError::TaskFailed(_)
            | StoreError::NoRuntime(_) => ErrorKind::Network,
            StoreError::DataFormat { .. }
            | StoreError::EmptyPayload { .. }
            | StoreError::GraphQl(_) => ErrorKind::DataFormat,
        }
    }
}
