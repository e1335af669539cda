use url::Url;

/// Extracts the host shown in front of a result line
///
/// The port is not part of the host, so `http://example.com:8080/` is
/// reported as `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use purr_links::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), "example.com");
/// ```
pub fn extract_host(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_lowercase()
}
