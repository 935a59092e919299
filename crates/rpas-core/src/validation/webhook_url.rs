use url::Url;

/// Syntax check for a webhook endpoint: must parse as an absolute URL with an
/// `http` or `https` scheme and a non-empty host.
///
/// No DNS resolution or reachability check is performed.
pub fn validate_webhook_url(candidate: &str) -> bool {
    let parsed = match Url::parse(candidate) {
        Ok(url) => url,
        Err(_) => return false,
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    parsed.host_str().is_some_and(|host| !host.is_empty())
}
