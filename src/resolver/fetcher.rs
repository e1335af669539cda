//! HTTP plumbing shared by every resolver
//!
//! This module handles:
//! - Building the shared HTTP client (manual redirects, connect timeout, user agent)
//! - Sending one request bounded by a deadline and a cancellation token
//! - Reading small response bodies under the same bounds
//! - Sorting transport errors into silent drops and hard failures

use crate::config::ResolverConfig;
use crate::{ResolveError, ResolveResult};
use reqwest::{redirect::Policy, Client, RequestBuilder, Response};
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Error message fragments that identify a failed host lookup
const HOST_NOT_FOUND_MARKERS: [&str; 5] = [
    "dns error",
    "failed to lookup address",
    "no such host",
    "name or service not known",
    "temporary failure in name resolution",
];

/// Why a request never produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// DNS lookup failed
    HostNotFound,
    /// TLS rejected the peer certificate
    Certificate,
    /// The peer closed the connection during the TLS handshake
    HandshakeEof,
    /// Connect, response or body read exceeded its deadline
    TimedOut,
    /// Nothing listening on the remote port
    Refused,
    /// Anything else
    Other,
}

impl FailureKind {
    /// Returns true for failures that end a resolution without any output
    ///
    /// Only [`FailureKind::Other`] is escalated as a hard failure.
    pub fn is_silent(self) -> bool {
        !matches!(self, FailureKind::Other)
    }
}

/// Builds the HTTP client shared by all resolver tasks
///
/// Redirects are never followed by the client: the web resolver walks them
/// itself so the hop counter stays authoritative. Proxy environment variables
/// are ignored.
///
/// # Arguments
///
/// * `config` - The resolver configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use purr_links::config::ResolverConfig;
/// use purr_links::resolver::build_http_client;
///
/// let client = build_http_client(&ResolverConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ResolverConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout())
        .redirect(Policy::none())
        .no_proxy()
        .build()
}

/// Upper bound on a single request/response exchange
pub fn exchange_deadline(config: &ResolverConfig) -> Duration {
    config.connect_timeout() + config.read_timeout()
}

/// Sorts a transport error into one of the known failure kinds
///
/// The error's source chain is inspected for I/O error kinds first, then its
/// rendered messages are matched against known DNS and TLS wording.
pub fn classify_error(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        return FailureKind::TimedOut;
    }

    let mut messages = error.to_string().to_lowercase();
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            match io_error.kind() {
                io::ErrorKind::ConnectionRefused => return FailureKind::Refused,
                io::ErrorKind::TimedOut => return FailureKind::TimedOut,
                _ => {}
            }
        }
        messages.push_str(" | ");
        messages.push_str(&cause.to_string().to_lowercase());
        source = cause.source();
    }

    classify_messages(&messages)
}

/// Matches lowercased error messages against known DNS and TLS wording
fn classify_messages(messages: &str) -> FailureKind {
    if HOST_NOT_FOUND_MARKERS.iter().any(|m| messages.contains(m)) {
        FailureKind::HostNotFound
    } else if messages.contains("certificate") {
        FailureKind::Certificate
    } else if messages.contains("handshake") && messages.contains("eof") {
        FailureKind::HandshakeEof
    } else if messages.contains("connection refused") {
        FailureKind::Refused
    } else {
        FailureKind::Other
    }
}

/// Turns a transport error into either a silent drop or a hard failure
pub(crate) fn absorb_transport_error<T>(url: &Url, error: reqwest::Error) -> ResolveResult<Option<T>> {
    let kind = classify_error(&error);
    if kind.is_silent() {
        debug!(url = %url, failure = ?kind, error = %error, "Dropping link after network failure");
        Ok(None)
    } else {
        Err(ResolveError::Http {
            url: url.to_string(),
            source: error,
        })
    }
}

/// Sends one request, bounded by `limit` and by `cancel`
///
/// # Returns
///
/// * `Ok(Some(Response))` - Headers were received in time
/// * `Ok(None)` - Cancelled, timed out, or failed in an expected way
/// * `Err(ResolveError)` - Unclassified transport failure
pub async fn send_bounded(
    request: RequestBuilder,
    url: &Url,
    limit: Duration,
    cancel: &CancellationToken,
) -> ResolveResult<Option<Response>> {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(url = %url, "Cancelled while waiting for response");
            return Ok(None);
        }
        outcome = tokio::time::timeout(limit, request.send()) => outcome,
    };

    match outcome {
        Ok(Ok(response)) => Ok(Some(response)),
        Ok(Err(e)) => absorb_transport_error(url, e),
        Err(_) => {
            debug!(url = %url, limit_ms = limit.as_millis() as u64, "Request timed out");
            Ok(None)
        }
    }
}

/// Reads a whole (small) response body, bounded by `limit` and by `cancel`
pub async fn read_body(
    response: Response,
    url: &Url,
    limit: Duration,
    cancel: &CancellationToken,
) -> ResolveResult<Option<Vec<u8>>> {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(url = %url, "Cancelled while reading body");
            return Ok(None);
        }
        outcome = tokio::time::timeout(limit, response.bytes()) => outcome,
    };

    match outcome {
        Ok(Ok(bytes)) => Ok(Some(bytes.to_vec())),
        Ok(Err(e)) => absorb_transport_error(url, e),
        Err(_) => {
            debug!(url = %url, "Timed out reading body");
            Ok(None)
        }
    }
}
