use crate::UrlError;
use url::Url;

/// Scheme prefix given to candidates that arrive without one
const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Returns true if `raw` already starts with `http://` or `https://`
///
/// The check ignores ASCII case, since the extractor matches links
/// case-insensitively.
pub fn has_http_scheme(raw: &str) -> bool {
    let lower = raw
        .get(..8)
        .unwrap_or(raw)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Prefixes `http://` to a candidate that lacks an HTTP(S) scheme
///
/// # Examples
///
/// ```
/// use purr_links::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "http://example.com");
/// assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    if has_http_scheme(raw) {
        raw.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, raw)
    }
}

/// Turns a raw web candidate into the URL of the first probe
///
/// # Arguments
///
/// * `raw` - The candidate text as matched in the chat message
///
/// # Returns
///
/// * `Ok(Url)` - An absolute HTTP(S) URL with a host
/// * `Err(UrlError)` - The candidate cannot be turned into a fetchable URL
pub fn parse_candidate_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(&ensure_scheme(raw)).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_fetchable(url)
}

/// Resolves a `Location` header value against the URL that produced it
///
/// Relative references (`/next`, `../up`, `?page=2`) are resolved per
/// RFC 3986; absolute ones replace the current URL outright.
///
/// # Arguments
///
/// * `current` - The URL the redirect response came from
/// * `location` - The raw `Location` header value
///
/// # Returns
///
/// * `Ok(Url)` - The next URL to probe
/// * `Err(UrlError)` - The location cannot be resolved to an HTTP(S) URL
pub fn resolve_location(current: &Url, location: &str) -> Result<Url, UrlError> {
    let next = current
        .join(location.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    check_fetchable(next)
}

fn check_fetchable(url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
