use super::fetcher::{exchange_deadline, read_body, send_bounded};
use super::outcome::ResolvedResult;
use crate::config::{ResolverConfig, SpotifyConfig};
use crate::{ResolveError, ResolveResult, UrlError};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

const LOOKUP_PATH: &str = "lookup/1/";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    info: Option<LookupInfo>,
    track: Option<Track>,
}

#[derive(Debug, Deserialize)]
struct LookupInfo {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: Option<String>,
    artists: Option<Vec<Artist>>,
    album: Option<Album>,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Album {
    name: Option<String>,
    released: Option<Released>,
}

/// Release date as sent: usually a year string, sometimes a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Released {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Released {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Released::Text(text) => f.write_str(text),
            Released::Number(number) => write!(f, "{}", number),
        }
    }
}

impl Track {
    /// `name - artist... - album (released)`; missing fields render empty
    fn summary(&self) -> String {
        let mut summary = self.name.clone().unwrap_or_default();

        for artist in self.artists.iter().flatten() {
            summary.push_str(" - ");
            summary.push_str(artist.name.as_deref().unwrap_or_default());
        }

        if let Some(album) = &self.album {
            let released = album
                .released
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            summary.push_str(&format!(
                " - {} ({})",
                album.name.as_deref().unwrap_or_default(),
                released
            ));
        }

        summary
    }
}

/// Describes `spotify:` URIs via the metadata lookup service
#[derive(Debug, Clone)]
pub struct SpotifyResolver {
    client: Client,
    config: SpotifyConfig,
    deadline: Duration,
}

impl SpotifyResolver {
    pub fn new(client: Client, config: SpotifyConfig, resolver: &ResolverConfig) -> Self {
        Self {
            client,
            config,
            deadline: exchange_deadline(resolver),
        }
    }

    /// Builds the lookup URL for a `spotify:` URI
    pub fn lookup_url(&self, uri: &str) -> Result<Url, UrlError> {
        let base = Url::parse(&self.config.lookup_base).map_err(|e| UrlError::Parse(e.to_string()))?;
        let mut url = base
            .join(LOOKUP_PATH)
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        url.query_pairs_mut().append_pair("uri", uri);
        Ok(url)
    }

    /// Looks up `uri` and summarises it when it is a track
    pub async fn resolve(
        &self,
        uri: &str,
        cancel: &CancellationToken,
    ) -> ResolveResult<Option<ResolvedResult>> {
        let url = self.lookup_url(uri).map_err(|source| ResolveError::InvalidUrl {
            raw: uri.to_string(),
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

        let lookup: LookupResponse = match serde_json::from_slice(&body) {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(uri, error = %e, "Cannot parse Spotify response");
                return Ok(None);
            }
        };

        Ok(describe(uri, &lookup).map(|summary| ResolvedResult::Track { summary }))
    }
}

/// Builds the one-line summary of a lookup response
fn describe(uri: &str, lookup: &LookupResponse) -> Option<String> {
    let Some(info) = &lookup.info else {
        warn!(uri, "No info block on Spotify response");
        return None;
    };

    let kind = info.kind.as_deref().unwrap_or_default();
    if kind != "track" {
        debug!(uri, kind, "Not describing non-track item");
        return None;
    }

    let Some(track) = &lookup.track else {
        warn!(uri, kind, "No data block on Spotify response");
        return None;
    };

    Some(track.summary())
}
