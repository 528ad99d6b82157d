//! The transport seam between the gateway and the network.

use http::HeaderMap;
use url::Url;

use crate::{codec::EncodedRequestBody, response::RawResponse};

/// A fully prepared gateway request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub endpoint: Url,
    pub headers: HeaderMap,
    pub body: EncodedRequestBody,
}

/// Delivers an encoded request and hands back the raw response.
///
/// Timeouts, TLS and connection reuse are the transport's business. The
/// gateway only communicates the client timeout through the request headers.
/// Implementations shared between tasks must tolerate concurrent calls.
pub trait Transport {
    type Error: std::error::Error;

    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<RawResponse, Self::Error>>;
}

#[cfg(feature = "http-client")]
pub use http_client::{HttpTransport, HttpTransportError};

#[cfg(feature = "http-client")]
mod http_client {
    use super::*;

    /// A [`Transport`] backed by a `reqwest` client.
    #[derive(Debug, Clone, Default)]
    pub struct HttpTransport {
        pub client: reqwest::Client,
    }

    impl HttpTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            HttpTransport { client }
        }
    }

    #[derive(Debug, thiserror::Error)]
    pub enum HttpTransportError {
        #[error("HTTP request error: {0}")]
        HttpRequestError(#[from] reqwest::Error),
        /// The gateway answered with a non-success HTTP status, so no
        /// transaction result is available.
        #[error("Unexpected HTTP status {status}: {body}")]
        UnexpectedStatus { status: u16, body: String },
    }

    impl Transport for HttpTransport {
        type Error = HttpTransportError;

        async fn send(&self, request: TransportRequest) -> Result<RawResponse, Self::Error> {
            let response = self
                .client
                .post(request.endpoint)
                .headers(request.headers)
                .body(request.body.into_string())
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                return Err(HttpTransportError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(RawResponse::new(status.as_u16(), body))
        }
    }
}
