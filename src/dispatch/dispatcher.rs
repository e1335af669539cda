use super::supervisor::{supervise, ResolveTask};
use crate::config::Config;
use crate::extract::{extract_candidates, CandidateKind, LinkCandidate};
use crate::output::{ResolutionContext, ResultSink};
use crate::resolver::{build_http_client, GiphyResolver, SpotifyResolver, WebLinkResolver};
use crate::PurrError;
use futures::FutureExt;
use reqwest::Client;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, info_span, Instrument};

/// Spawns one isolated, cancellable resolver task per link candidate
///
/// The dispatcher never waits on the network itself: [`handle_message`]
/// returns as soon as the tasks are spawned. Tasks share nothing but the
/// HTTP client and the result sink.
///
/// Tasks run on the runtime the dispatcher was created in, so messages may
/// be handed over from any thread.
///
/// [`handle_message`]: ResolverDispatcher::handle_message
pub struct ResolverDispatcher {
    web: Arc<WebLinkResolver>,
    spotify: Option<Arc<SpotifyResolver>>,
    giphy: Option<Arc<GiphyResolver>>,
    sink: Arc<dyn ResultSink>,
    shutdown: CancellationToken,
    tasks: TaskTracker,
    runtime: Handle,
}

impl ResolverDispatcher {
    /// Creates a dispatcher with a freshly built HTTP client
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `sink` - Where results are delivered
    ///
    /// # Returns
    ///
    /// * `Ok(ResolverDispatcher)` - Ready to accept messages
    /// * `Err(PurrError)` - The HTTP client could not be built
    pub fn new(config: &Config, sink: Arc<dyn ResultSink>) -> Result<Self, PurrError> {
        let client = build_http_client(&config.resolver)?;
        Ok(Self::with_client(config, client, sink))
    }

    /// Creates a dispatcher over an existing client
    ///
    /// The client must not follow redirects on its own. Must be called inside
    /// a Tokio runtime.
    pub fn with_client(config: &Config, client: Client, sink: Arc<dyn ResultSink>) -> Self {
        let web = Arc::new(WebLinkResolver::new(client.clone(), config.resolver.clone()));

        let spotify = config.spotify.enabled.then(|| {
            Arc::new(SpotifyResolver::new(
                client.clone(),
                config.spotify.clone(),
                &config.resolver,
            ))
        });

        let giphy = config.giphy.enabled.then(|| {
            Arc::new(GiphyResolver::new(
                client.clone(),
                config.giphy.clone(),
                &config.resolver,
            ))
        });

        Self {
            web,
            spotify,
            giphy,
            sink,
            shutdown: CancellationToken::new(),
            tasks: TaskTracker::new(),
            runtime: Handle::current(),
        }
    }

    /// Extracts every candidate from a message and starts resolving each one
    ///
    /// # Returns
    ///
    /// The number of tasks spawned
    pub fn handle_message(&self, text: &str, context: &ResolutionContext) -> usize {
        extract_candidates(text)
            .into_iter()
            .filter(|candidate| self.dispatch(candidate.clone(), context))
            .count()
    }

    /// Starts resolving a single candidate
    ///
    /// Returns false when nothing was spawned: the dispatcher is shut down or
    /// the candidate's resolver is disabled.
    pub fn dispatch(&self, candidate: LinkCandidate, context: &ResolutionContext) -> bool {
        if self.shutdown.is_cancelled() {
            debug!(%candidate, "Dispatcher shut down, ignoring candidate");
            return false;
        }

        let Some(work) = self.work_for(&candidate, self.shutdown.child_token()) else {
            debug!(%candidate, "Resolver disabled, ignoring candidate");
            return false;
        };

        let span = info_span!(
            "resolve",
            kind = %candidate.kind(),
            candidate = candidate.raw(),
            target = %context.target
        );
        let sink = Arc::clone(&self.sink);
        let target = context.target.clone();

        self.tasks.spawn_on(
            async move { supervise(work, sink.as_ref(), &target).await }.instrument(span),
            &self.runtime,
        );
        true
    }

    fn work_for(&self, candidate: &LinkCandidate, cancel: CancellationToken) -> Option<ResolveTask> {
        let raw = candidate.raw().to_string();

        let work = match candidate.kind() {
            CandidateKind::Web => {
                let web = Arc::clone(&self.web);
                async move { web.resolve(&raw, &cancel).await }.boxed()
            }
            CandidateKind::SpotifyUri => {
                let spotify = Arc::clone(self.spotify.as_ref()?);
                async move { spotify.resolve(&raw, &cancel).await }.boxed()
            }
            CandidateKind::GiphySearch => {
                let giphy = Arc::clone(self.giphy.as_ref()?);
                async move { giphy.resolve(&raw, &cancel).await }.boxed()
            }
        };

        Some(work)
    }

    /// Cancels every outstanding task without waiting for them
    ///
    /// Candidates dispatched afterwards are ignored.
    pub fn shutdown(&self) {
        info!(in_flight = self.tasks.len(), "Shutting down resolver dispatcher");
        self.shutdown.cancel();
        self.tasks.close();
    }

    /// Waits until every task spawned so far has finished
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        if !self.shutdown.is_cancelled() {
            self.tasks.reopen();
        }
    }

    /// Number of resolver tasks still running
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
