//! Forbidden-host classification.
//!
//! # Responsibilities
//! - Classify a target hostname as forbidden (loopback, private, link-local,
//!   cloud metadata) or allowed
//! - Keep the gateway from being used as a relay into internal address space
//!
//! # Design Decisions
//! - Name-based filtering on the raw hostname only; no DNS resolution
//! - Runs once at admission; hosts reached via redirects are not re-checked.
//!   The filter is a coarse perimeter, not a full SSRF defense.

/// Returns true if the hostname must not be forwarded to.
///
/// Checks are ordered from cheapest to most specific and compare
/// case-insensitively against the raw hostname string.
pub fn is_forbidden(hostname: &str) -> bool {
    if hostname.is_empty() {
        return true;
    }
    let host = hostname.to_ascii_lowercase();

    if host == "localhost" || host.ends_with(".localhost") || host.ends_with(".local") {
        return true;
    }
    if host.starts_with("127.") || host.starts_with("10.") || host.starts_with("192.168.") {
        return true;
    }
    if in_172_private_block(&host) {
        return true;
    }
    matches!(host.as_str(), "0.0.0.0" | "169.254.169.254" | "[::1]")
}

/// True for `172.N.` prefixes where N is in the RFC 1918 range [16, 31].
fn in_172_private_block(host: &str) -> bool {
    let Some(rest) = host.strip_prefix("172.") else {
        return false;
    };
    let Some((second_octet, _)) = rest.split_once('.') else {
        return false;
    };
    matches!(second_octet.parse::<u8>(), Ok(n) if (16..=31).contains(&n))
}
