//! Web link resolution
//!
//! # Request Flow
//!
//! 1. Prefix `http://` when the candidate has no scheme
//! 2. Probe with HEAD, following 300-303 redirects by hand, at most
//!    [`MAX_HOPS`] times
//!    - Success status: go to step 3
//!    - Hop limit reached: report `Unresolved` and stop
//!    - Anything else: stop silently
//! 3. GET the settled URL and classify its `Content-Type`
//!    - Textual: scan the body for a title
//!    - Otherwise: report the MIME type and advertised size
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | 200-206, 304 | Resolved |
//! | 300-303 with `Location` | Next hop |
//! | 300-303 without `Location` | Silent |
//! | Any other status | Silent |
//! | DNS, TLS, timeout, refused | Silent |
//! | Unjoinable `Location` | Hard failure |
//! | Unclassified transport error | Hard failure |

use super::fetcher::{build_http_client, classify_error, exchange_deadline, send_bounded};
use super::outcome::ResolvedResult;
use super::title::scan_title;
use crate::config::ResolverConfig;
use crate::url::{extract_host, parse_candidate_url, resolve_location};
use crate::{ResolveError, ResolveResult};
use futures::TryStreamExt;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response, StatusCode};
use std::io;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Maximum number of redirects followed before giving up
pub const MAX_HOPS: u32 = 5;

/// How a probe response moves the redirect loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    Success,
    Redirect,
    Other,
}

fn classify_status(status: StatusCode) -> StatusClass {
    match status.as_u16() {
        200..=206 | 304 => StatusClass::Success,
        300..=303 => StatusClass::Redirect,
        _ => StatusClass::Other,
    }
}

/// Position in the redirect chain; owned by a single resolution
#[derive(Debug)]
struct RedirectState {
    current: Url,
    hops: u32,
}

impl RedirectState {
    fn new(start: Url) -> Self {
        Self {
            current: start,
            hops: 0,
        }
    }

    fn advance(&mut self, next: Url) {
        self.current = next;
        self.hops += 1;
    }

    fn exhausted(&self) -> bool {
        self.hops >= MAX_HOPS
    }
}

/// How the redirect loop ended
#[derive(Debug)]
enum ProbeOutcome {
    /// A success status was seen at this URL
    Resolved(Url),
    /// The hop limit was reached; holds the last redirect target
    Exhausted(Url),
    /// Silent stop
    Dropped,
}

/// Media type of a `Content-Type` value, parameters removed
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

/// Returns true when the body should be scanned for a title
fn is_textual(mime: &str) -> bool {
    let lower = mime.to_ascii_lowercase();
    (lower.starts_with("text/") && lower.len() > "text/".len()) || lower.contains("xhtml")
}

/// Resolves `Web` candidates into a title, a typed resource, or nothing
#[derive(Debug, Clone)]
pub struct WebLinkResolver {
    client: Client,
    config: ResolverConfig,
}

impl WebLinkResolver {
    /// Creates a resolver over an existing client
    ///
    /// The client must not follow redirects itself.
    pub fn new(client: Client, config: ResolverConfig) -> Self {
        Self { client, config }
    }

    /// Creates a resolver with its own client
    pub fn from_config(config: &ResolverConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, config.clone()))
    }

    /// Resolves one web candidate
    ///
    /// # Arguments
    ///
    /// * `raw` - The candidate text, with or without a scheme
    /// * `cancel` - Stops the resolution at the next hop or mid-request
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ResolvedResult))` - One line to deliver
    /// * `Ok(None)` - Silent failure or cancellation
    /// * `Err(ResolveError)` - Hard failure
    pub async fn resolve(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> ResolveResult<Option<ResolvedResult>> {
        let start = parse_candidate_url(raw).map_err(|source| ResolveError::InvalidUrl {
            raw: raw.to_string(),
            source,
        })?;

        match self.follow_redirects(start, cancel).await? {
            ProbeOutcome::Resolved(url) => self.fetch(url, cancel).await,
            ProbeOutcome::Exhausted(url) => Ok(Some(ResolvedResult::Unresolved {
                host: extract_host(&url),
                hops: MAX_HOPS,
            })),
            ProbeOutcome::Dropped => Ok(None),
        }
    }

    async fn follow_redirects(
        &self,
        start: Url,
        cancel: &CancellationToken,
    ) -> ResolveResult<ProbeOutcome> {
        let mut state = RedirectState::new(start);

        loop {
            if cancel.is_cancelled() {
                debug!(url = %state.current, hops = state.hops, "Cancelled between hops");
                return Ok(ProbeOutcome::Dropped);
            }

            let request = self.client.head(state.current.clone());
            let response = match send_bounded(request, &state.current, self.deadline(), cancel).await? {
                Some(response) => response,
                None => return Ok(ProbeOutcome::Dropped),
            };

            let status = response.status();
            match classify_status(status) {
                StatusClass::Success => return Ok(ProbeOutcome::Resolved(state.current)),
                StatusClass::Redirect => {
                    let location = match response.headers().get(LOCATION) {
                        Some(value) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        None => {
                            debug!(url = %state.current, status = status.as_u16(), "Redirect without Location");
                            return Ok(ProbeOutcome::Dropped);
                        }
                    };

                    let next = resolve_location(&state.current, &location).map_err(|source| {
                        ResolveError::InvalidLocation {
                            url: state.current.to_string(),
                            location: location.clone(),
                            source,
                        }
                    })?;

                    debug!(from = %state.current, to = %next, hop = state.hops + 1, "Following redirect");
                    state.advance(next);

                    if state.exhausted() {
                        debug!(url = %state.current, "Hop limit reached");
                        return Ok(ProbeOutcome::Exhausted(state.current));
                    }
                }
                StatusClass::Other => {
                    debug!(url = %state.current, status = status.as_u16(), "Unhandled status");
                    return Ok(ProbeOutcome::Dropped);
                }
            }
        }
    }

    async fn fetch(
        &self,
        url: Url,
        cancel: &CancellationToken,
    ) -> ResolveResult<Option<ResolvedResult>> {
        let request = self.client.get(url.clone());
        let response = match send_bounded(request, &url, self.deadline(), cancel).await? {
            Some(response) => response,
            None => return Ok(None),
        };

        let mime = match response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(media_type)
        {
            Some(mime) if !mime.is_empty() => mime.to_string(),
            // Nothing to classify, so no typed-resource line either
            _ => {
                debug!(url = %url, "Response has no Content-Type");
                return Ok(None);
            }
        };

        let host = extract_host(&url);

        if is_textual(&mime) {
            Ok(self
                .read_title(response, &url, cancel)
                .await?
                .map(|title| ResolvedResult::Title { host, title }))
        } else {
            Ok(Some(ResolvedResult::TypedResource {
                host,
                mime,
                size: response.content_length(),
            }))
        }
    }

    async fn read_title(
        &self,
        response: Response,
        url: &Url,
        cancel: &CancellationToken,
    ) -> ResolveResult<Option<String>> {
        let stream = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
        );
        let reader = StreamReader::new(stream);

        let scanned = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "Cancelled while scanning for title");
                return Ok(None);
            }
            scanned = tokio::time::timeout(
                self.deadline(),
                scan_title(reader, self.config.max_title_bytes, self.config.read_timeout()),
            ) => scanned,
        };

        let scanned = match scanned {
            Ok(scanned) => scanned,
            Err(_) => {
                debug!(url = %url, "Title scan exceeded its deadline");
                return Ok(None);
            }
        };

        match scanned {
            Ok(title) => Ok(Some(title)),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                debug!(url = %url, "Timed out reading page body");
                Ok(None)
            }
            Err(e) => {
                let silent = e
                    .get_ref()
                    .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
                    .map_or(false, |inner| classify_error(inner).is_silent());
                if silent {
                    debug!(url = %url, error = %e, "Dropping link after body failure");
                    Ok(None)
                } else {
                    Err(ResolveError::Body {
                        url: url.to_string(),
                        source: e,
                    })
                }
            }
        }
    }

    fn deadline(&self) -> std::time::Duration {
        exchange_deadline(&self.config)
    }
}
