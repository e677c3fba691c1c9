//! Declarative HTTP request dispatch.
//!
//! Callers describe *what* a request is — path, method, headers, body shape —
//! as a plain data value ([`RequestDescriptor`]), and a [`Dispatcher`] turns
//! that declaration into a transport-level request, executes it, and maps the
//! outcome into either a decoded typed value or one variant of a closed error
//! taxonomy ([`DispatchError`]) that separates transport failure from
//! HTTP-level failure from decoding failure.
//!
//! # Pipeline
//!
//! ```text
//! RequestDescriptor ──build──► WireRequest ──execute──► status/headers/bytes ──classify──► T | DispatchError
//!                                   │
//!                                   └──► DiagnosticEmitter (side channel, never affects the result)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use wirecall_core::{ContentKind, Dispatcher, DispatchError, RequestDescriptor};
//! # use serde::Deserialize;
//! # #[derive(Deserialize)]
//! # struct User { id: u32, name: String }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::builder()
//!     .with_host("api.example.com")
//!     .build()?;
//!
//! let create = RequestDescriptor::post("/users")
//!     .with_content_kind(ContentKind::Json)
//!     .with_default_header("accept", "application/json")
//!     .with_field("name", "Alice");
//!
//! match dispatcher.dispatch::<User>(&create).await {
//!     Ok(user) => println!("created user {}", user.id),
//!     Err(DispatchError::Client { status, .. }) => eprintln!("rejected: {status}"),
//!     Err(other) => return Err(other.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Scope
//!
//! The transport (pooling, TLS, redirects, retries) is an injected
//! [`Transport`] capability; a [`ReqwestTransport`] is bundled. The core
//! itself performs no retries, no caching and no recovery — every failure
//! surfaces to the caller as a single [`DispatchError`].

mod client;

pub use self::client::{
    BuildError, ContentKind, DiagnosticEmitter, DispatchError, Dispatcher, DispatcherBuilder,
    EncodeError, MultipartPart, ReqwestTransport, RequestDescriptor, TracingEmitter, Transport,
    TransportError, TransportFuture, TransportResponse, Verbosity, WireRequest,
};
