use std::sync::Arc;

use http::uri::Scheme;
use url::Url;

use super::diagnostics::{DiagnosticEmitter, TracingEmitter, Verbosity};
use super::error::BuildError;
use super::transport::ReqwestTransport;
use super::Dispatcher;

/// Builder for [`Dispatcher`] instances backed by the bundled reqwest transport.
///
/// Defaults: HTTP scheme, host `127.0.0.1`, port 80, no base path, `Info`
/// verbosity, [`TracingEmitter`] diagnostics.
///
/// # Example
///
/// ```rust
/// use http::uri::Scheme;
/// use wirecall_core::{Dispatcher, Verbosity};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dispatcher = Dispatcher::builder()
///     .with_scheme(Scheme::HTTPS)
///     .with_host("api.example.com")
///     .with_port(443)
///     .with_base_path("/v1")
///     .with_verbosity(Verbosity::Verbose)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, derive_more::Debug)]
pub struct DispatcherBuilder {
    client: reqwest::Client,
    scheme: Scheme,
    host: String,
    port: u16,
    base_path: Option<String>,
    verbosity: Verbosity,
    #[debug(ignore)]
    emitter: Arc<dyn DiagnosticEmitter>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            client: reqwest::Client::default(),
            scheme: Scheme::HTTP,
            host: "127.0.0.1".to_string(),
            port: 80,
            base_path: None,
            verbosity: Verbosity::default(),
            emitter: Arc::new(TracingEmitter),
        }
    }
}

impl DispatcherBuilder {
    /// Sets the scheme (HTTP or HTTPS).
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the host name or IP address of the endpoint.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets a base path prepended to every descriptor path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Supplies a pre-configured `reqwest::Client` (timeouts, TLS, proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
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

    /// Builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Fails with [`BuildError::InvalidUrl`] when scheme, host, port and base
    /// path do not combine into a valid URL.
    pub fn build(self) -> Result<Dispatcher<ReqwestTransport>, BuildError> {
        let Self {
            client,
            scheme,
            host,
            port,
            base_path,
            verbosity,
            emitter,
        } = self;

        let path = base_path
            .map(|path| format!("/{}", path.trim_matches('/')))
            .unwrap_or_default();
        let base_url = format!("{scheme}://{host}:{port}{path}").parse::<Url>()?;

        Ok(Dispatcher {
            transport: ReqwestTransport::new(client),
            base_url,
            emitter,
            verbosity,
        })
    }
}
