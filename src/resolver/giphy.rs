use super::fetcher::{exchange_deadline, read_body, send_bounded};
use super::outcome::ResolvedResult;
use crate::config::{GiphyConfig, ResolverConfig};
use crate::{ResolveError, ResolveResult, UrlError};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

const SEARCH_PATH: &str = "v1/gifs/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<Vec<GifEntry>>,
}

#[derive(Debug, Deserialize)]
struct GifEntry {
    #[serde(default)]
    embed_url: Option<String>,
}

/// Looks up `gif:`/`giphy:` search terms and replies with an embed link
#[derive(Debug, Clone)]
pub struct GiphyResolver {
    client: Client,
    config: GiphyConfig,
    deadline: Duration,
}

impl GiphyResolver {
    pub fn new(client: Client, config: GiphyConfig, resolver: &ResolverConfig) -> Self {
        Self {
            client,
            config,
            deadline: exchange_deadline(resolver),
        }
    }

    /// Builds the search request URL for a term
    ///
    /// # Example
    ///
    /// ```
    /// use purr_links::config::{GiphyConfig, ResolverConfig};
    /// use purr_links::resolver::GiphyResolver;
    ///
    /// let resolver = GiphyResolver::new(
    ///     reqwest::Client::new(),
    ///     GiphyConfig::default(),
    ///     &ResolverConfig::default(),
    /// );
    /// let url = resolver.search_url("blood sword").unwrap();
    /// assert_eq!(url.path(), "/v1/gifs/search");
    /// assert!(url.query().unwrap().ends_with("q=blood+sword"));
    /// ```
    pub fn search_url(&self, term: &str) -> Result<Url, UrlError> {
        let base = Url::parse(&self.config.api_base).map_err(|e| UrlError::Parse(e.to_string()))?;
        let mut url = base
            .join(SEARCH_PATH)
            .map_err(|e| UrlError::Parse(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .append_pair("rating", &self.config.rating)
            .append_pair("limit", "1")
            .append_pair("q", term);

        Ok(url)
    }

    /// Searches for `term` and returns the first hit's embed URL
    pub async fn resolve(
        &self,
        term: &str,
        cancel: &CancellationToken,
    ) -> ResolveResult<Option<ResolvedResult>> {
        let url = self.search_url(term).map_err(|source| ResolveError::InvalidUrl {
            raw: term.to_string(),
            source,
        })?;

        let request = self.client.get(url.clone()).header(ACCEPT, "application/json");
        let response = match send_bounded(request, &url, self.deadline, cancel).await? {
            Some(response) => response,
            None => return Ok(None),
        };

        let body = match read_body(response, &url, self.deadline, cancel).await? {
            Some(body) => body,
            None => return Ok(None),
        };

        let parsed: SearchResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(term, error = %e, "Cannot parse Giphy response");
                return Ok(None);
            }
        };

        let Some(entries) = parsed.data else {
            warn!(term, "No data block on Giphy response");
            return Ok(None);
        };

        let embed_url = entries
            .into_iter()
            .filter_map(|entry| entry.embed_url)
            .find(|embed_url| !embed_url.is_empty());

        match embed_url {
            Some(embed_url) => Ok(Some(ResolvedResult::Gif { embed_url })),
            None => {
                debug!(term, "No Giphy results");
                Ok(None)
            }
        }
    }
}
