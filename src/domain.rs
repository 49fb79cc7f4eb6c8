use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ImportError, Result};

/// Cached regex for the `ow:host` attribute
static HOST_URL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get or initialize the host url regex
///
/// Group 1 is everything after `scheme://`: the host, an optional port and
/// an optional path, query or fragment.
fn get_host_url_regex() -> &'static Regex {
    HOST_URL_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^https?://([a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*(?::[0-9]{1,5})?(?:[/?#]\S*)?)$",
        )
        .expect("Failed to compile host url regex")
    })
}

/// Domain information derived from a WPT host url
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDomain {
    /// Bare host name, lower-cased, without port or path
    pub domain: String,
    /// First domain label, skipping a leading `www`
    pub site_name: String,
}

/// Split a host url such as `http://www.example.com/index.php` into
/// `example.com`-style domain and `example`-style site name
pub fn extract_domain(host: &str) -> Result<HostDomain> {
    let invalid = || ImportError::InvalidHostUrl {
        host: host.to_string(),
    };

    let caps = get_host_url_regex()
        .captures(host.trim())
        .ok_or_else(invalid)?;

    let authority = caps[1]
        .split(['/', '?', '#'])
        .next()
        .ok_or_else(invalid)?;
    let domain = authority
        .split(':')
        .next()
        .ok_or_else(invalid)?
        .to_ascii_lowercase();

    let mut labels = domain.split('.');
    let first = labels.next().ok_or_else(invalid)?;
    let site_name = match (first, labels.next()) {
        ("www", Some(second)) => second,
        _ => first,
    }
    .to_string();

    Ok(HostDomain { domain, site_name })
}
