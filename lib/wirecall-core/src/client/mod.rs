use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

mod builder;
pub use self::builder::DispatcherBuilder;

mod descriptor;
pub use self::descriptor::{ContentKind, MultipartPart, RequestDescriptor};

mod body;
pub use self::body::EncodeError;

mod request;
pub use self::request::WireRequest;

mod transport;
pub use self::transport::{
    ReqwestTransport, Transport, TransportError, TransportFuture, TransportResponse,
};

mod diagnostics;
pub use self::diagnostics::{DiagnosticEmitter, TracingEmitter, Verbosity};

mod response;

mod error;
pub use self::error::{BuildError, DispatchError};

use self::diagnostics::Diagnostics;

/// Turns [`RequestDescriptor`]s into wire requests, executes them through a
/// [`Transport`], and classifies the outcome.
///
/// A dispatcher is read-only after construction: the base endpoint, the
/// verbosity threshold and the diagnostic emitter never change, so any number
/// of [`dispatch`](Self::dispatch) calls may run concurrently without
/// coordination. Each call owns its own wire request and result.
///
/// # Example
///
/// ```rust,no_run
/// use wirecall_core::{Dispatcher, RequestDescriptor};
/// # use serde::Deserialize;
/// # #[derive(Deserialize)]
/// # struct User { id: u32, name: String }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dispatcher = Dispatcher::builder()
///     .with_host("api.example.com")
///     .build()?;
///
/// let descriptor = RequestDescriptor::get("/users/7");
/// let user: User = dispatcher.dispatch(&descriptor).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, derive_more::Debug)]
pub struct Dispatcher<T = ReqwestTransport> {
    transport: T,
    base_url: Url,
    #[debug(ignore)]
    emitter: Arc<dyn DiagnosticEmitter>,
    verbosity: Verbosity,
}

impl Dispatcher<ReqwestTransport> {
    /// Starts a builder for a dispatcher backed by the bundled reqwest transport.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }
}

impl<T: Transport> Dispatcher<T> {
    /// Creates a dispatcher over a custom transport.
    pub fn new(transport: T, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            emitter: Arc::new(TracingEmitter),
            verbosity: Verbosity::default(),
        }
    }

    /// Sets the verbosity threshold for diagnostic emissions.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Replaces the diagnostic emitter.
    pub fn with_emitter(mut self, emitter: Arc<dyn DiagnosticEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Dispatches one descriptor: build, emit diagnostics, execute, classify.
    ///
    /// Exactly one transport invocation occurs per call, and none at all when
    /// the descriptor fails to build ([`DispatchError::InvalidRequest`]).
    /// Dropping the returned future cancels the in-flight exchange and skips
    /// the rest of the pipeline.
    ///
    /// # Errors
    ///
    /// Every failure is one variant of the closed [`DispatchError`] taxonomy;
    /// nothing is retried or swallowed.
    pub async fn dispatch<R>(&self, descriptor: &RequestDescriptor) -> Result<R, DispatchError>
    where
        R: DeserializeOwned,
    {
        // Fresh boundary per dispatch so part content cannot collide with it.
        let boundary = format!("----formdata-wirecall-{}", Uuid::new_v4());
        let request = request::build(descriptor, &self.base_url, &boundary)
            .map_err(DispatchError::InvalidRequest)?;

        let diagnostics = Diagnostics {
            emitter: self.emitter.as_ref(),
            threshold: self.verbosity,
        };
        diagnostics.request_built(&request);

        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(DispatchError::Transport)?;
        diagnostics.response_received(response.status, &response.headers, &response.body);

        response::classify(response.status, &response.body)
    }
}
