use super::body::EncodeError;
use super::transport::TransportError;

/// Errors that can occur while turning a descriptor into a wire request.
///
/// A build error always surfaces before any transport call is made.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum BuildError {
    /// The base endpoint and descriptor path do not combine into a valid URL.
    InvalidUrl(url::ParseError),

    /// A merged header name is not a valid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// A merged header value contains invalid characters.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// Encoding the request body failed.
    Encode(EncodeError),
}

/// Closed error taxonomy of the dispatch pipeline.
///
/// Every failure of [`dispatch`](super::Dispatcher::dispatch) is exactly one
/// of these variants; all are terminal. The core performs no retries and no
/// fallback — recovery policy belongs to the caller, and each variant carries
/// enough context (status code, raw bytes, underlying cause) to decide on it.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum DispatchError {
    /// The descriptor failed to build into a wire request; no transport call occurred.
    #[display("Invalid request: {_0}")]
    InvalidRequest(BuildError),

    /// The transport failed before producing a status/bytes pair.
    #[display("Transport error: {_0}")]
    Transport(TransportError),

    /// The server answered 2xx with an empty body.
    #[display("Successful response carried no body")]
    NoData,

    /// The server answered 2xx but the body failed to decode as the expected type.
    #[display("Failed to decode response at '{path}': {error}\n{body}")]
    #[from(skip)]
    Decoding {
        /// JSON path where decoding failed.
        path: String,
        /// The underlying decode failure.
        error: serde_json::Error,
        /// The response body that failed to decode.
        body: String,
    },

    /// The server answered with a 4xx status.
    #[display("Client error ({status})")]
    #[from(skip)]
    Client {
        /// The HTTP status code.
        status: u16,
        /// The raw response body, preserved unmodified.
        body: Vec<u8>,
    },

    /// The server answered with a 5xx status.
    #[display("Server error ({status})")]
    #[from(skip)]
    Server {
        /// The HTTP status code.
        status: u16,
        /// The raw response body, preserved unmodified.
        body: Vec<u8>,
    },

    /// Any other outcome (1xx, 3xx surfaced without redirect handling, out-of-range codes).
    #[display("Unexpected response status")]
    Unknown,
}

impl DispatchError {
    /// The HTTP status code, for the variants that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body, for the variants that preserve it.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Client { body, .. } | Self::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}
