use http::{HeaderMap, StatusCode};
use tracing::{debug, info};

use super::request::WireRequest;

/// Ordered verbosity levels for diagnostic emissions.
///
/// An emission is suppressed unless its level is at or above the configured
/// threshold, so `Verbose` shows everything and `Error` nearly nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Everything, including a shell replay string and response bodies.
    Verbose,
    /// Method, URL and response status per dispatch.
    #[default]
    Info,
    /// Reserved for emitters that only want problems.
    Warning,
    /// Reserved for emitters that only want failures.
    Error,
}

/// Side-channel observer of the dispatch pipeline.
///
/// Receives the finally-built wire request and the raw response for
/// human-readable output. Emitters have no effect on control flow or on the
/// dispatch result; they may be invoked from many concurrent dispatches and
/// must not block.
pub trait DiagnosticEmitter: Send + Sync {
    /// Called once per dispatch with the built wire request.
    ///
    /// `replay` is true when the configured verbosity asks for a shell-style
    /// reproduction string — render [`WireRequest::curl_command`] then.
    fn on_request_built(&self, request: &WireRequest, replay: bool);

    /// Called once per dispatch with the transport response.
    ///
    /// `body` is `Some` only when the configured verbosity admits response
    /// bodies.
    fn on_response_received(&self, status: StatusCode, headers: &HeaderMap, body: Option<&[u8]>);
}

/// Default emitter that renders through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

impl DiagnosticEmitter for TracingEmitter {
    fn on_request_built(&self, request: &WireRequest, replay: bool) {
        info!(method = %request.method(), url = %request.url(), "sending request");
        if replay {
            debug!(curl = %request.curl_command(), "request replay");
        }
    }

    fn on_response_received(&self, status: StatusCode, headers: &HeaderMap, body: Option<&[u8]>) {
        info!(%status, "response received");
        if let Some(body) = body {
            debug!(?headers, body = %String::from_utf8_lossy(body), "response body");
        }
    }
}

/// Threshold gate applied by the dispatcher before reaching the emitter.
pub(super) struct Diagnostics<'a> {
    pub(super) emitter: &'a dyn DiagnosticEmitter,
    pub(super) threshold: Verbosity,
}

impl Diagnostics<'_> {
    fn admits(&self, level: Verbosity) -> bool {
        level >= self.threshold
    }

    pub(super) fn request_built(&self, request: &WireRequest) {
        if self.admits(Verbosity::Info) {
            self.emitter
                .on_request_built(request, self.admits(Verbosity::Verbose));
        }
    }

    pub(super) fn response_received(&self, status: StatusCode, headers: &HeaderMap, body: &[u8]) {
        if self.admits(Verbosity::Info) {
            let body = self.admits(Verbosity::Verbose).then_some(body);
            self.emitter.on_response_received(status, headers, body);
        }
    }
}
