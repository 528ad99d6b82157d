//! Error types.
//!
//! Request construction errors come from [`payflow_core`] and are re-exported
//! here. [`GatewayError`] adds the failures that can only happen once a
//! request is committed.

pub use payflow_core::errors::{Error, Result};

/// Errors returned by [`Gateway`](crate::gateway::Gateway) verbs.
///
/// An unsuccessful transaction is not an error: it comes back as a
/// [`Response`](crate::response::Response) whose `is_successful()` is false.
/// A transport failure means the outcome is unknown and is always reported
/// here instead.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError<E> {
    /// The request could not be built.
    #[error("Request error: {0}")]
    Request(#[from] Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// The transport failed to deliver the request or read the response.
    #[error("Transport error: {0}")]
    Transport(#[source] E),
}

impl<E> GatewayError<E> {
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}
