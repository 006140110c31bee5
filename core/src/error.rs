//! Error types for the request client.
//!
//! # Design
//! Argument problems are raised synchronously from `send` before any I/O.
//! Everything that happens after the request leaves (`Transport`, `Status`,
//! `Callback`) is reported through `Pending::wait`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A required argument was missing or malformed. Nothing was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-2xx response, only under `StatusPolicy::Error`.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The raw payload could not be encoded as a request body.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid config: {0}")]
    Config(String),

    /// The completion callback panicked.
    #[error("completion callback failed: {0}")]
    Callback(String),
}
