use url::Url;

/// Extracts the registrable domain from a URL
///
/// The registrable domain is the host used to decide "same site": it is
/// lowercased and a leading `www.` is dropped, so `www.example.com` and
/// `example.com` compare equal.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use profilebot::url::registrable_domain;
///
/// let url = Url::parse("https://www.Example.com/about").unwrap();
/// assert_eq!(registrable_domain(&url), Some("example.com".to_string()));
/// ```
pub fn registrable_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let host = h.to_lowercase();
        match host.strip_prefix("www.") {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => host,
        }
    })
}

/// Checks whether a URL belongs to the given site scope
///
/// `scope` must already be a registrable domain (as produced by
/// [`registrable_domain`]).
pub fn same_site(url: &Url, scope: &str) -> bool {
    registrable_domain(url).as_deref() == Some(scope)
}
