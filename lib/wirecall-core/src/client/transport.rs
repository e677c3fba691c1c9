use std::future::Future;
use std::pin::Pin;

use http::{HeaderMap, StatusCode};
use reqwest::Body;

use super::request::WireRequest;

/// The status/headers/bytes triple produced by a successful transport exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code of the response.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body; empty when the server sent none.
    pub body: Vec<u8>,
}

/// Failure reported by a [`Transport`] before a response triple was produced.
///
/// Covers timeouts, DNS failures, connection errors and the like. The
/// underlying cause is preserved for caller diagnostics.
#[derive(Debug, derive_more::Display)]
#[display("{source}")]
pub struct TransportError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    /// Wraps an arbitrary transport-level failure.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error)
    }
}

/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>>;

/// The external capability that performs the actual network exchange.
///
/// The dispatch pipeline treats this as a black box: pooling, TLS, redirect
/// policy and retries are transport concerns, never configured here. Exactly
/// one `execute` call happens per dispatch. Dropping the returned future
/// cancels the exchange.
pub trait Transport: Send + Sync {
    /// Executes the wire request and resolves to the response triple, or to a
    /// [`TransportError`] when no status/bytes pair could be produced.
    fn execute<'a>(&'a self, request: &'a WireRequest) -> TransportFuture<'a>;
}

/// Bundled [`Transport`] over a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an already-configured client (pooling, TLS, timeouts are its business).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn execute<'a>(&'a self, request: &'a WireRequest) -> TransportFuture<'a> {
        Box::pin(async move {
            let mut wire = reqwest::Request::new(request.method().clone(), request.url().clone());
            *wire.headers_mut() = request.headers().clone();
            if let Some(body) = request.body() {
                *wire.body_mut() = Some(Body::from(body.to_vec()));
            }

            let response = self.client.execute(wire).await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();

            Ok(TransportResponse {
                status,
                headers,
                body,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_preserves_cause() {
        let error = TransportError::new("connection reset");

        assert_eq!(error.to_string(), "connection reset");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_transport_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<TransportError>();
        assert_sync::<TransportError>();
    }
}
