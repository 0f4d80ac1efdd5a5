//! SSRF (Server-Side Request Forgery) protection.
//!
//! Validates that URLs and resolved IP addresses are not pointing to
//! private, internal, or reserved addresses. Resolution failures are
//! treated as private: the guard fails closed.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;
use std::time::Duration;

use ipnet::{Ipv4Net, Ipv6Net};
use url::{Host, Url};

use super::url::canonicalize;

/// Upper bound on a single DNS lookup.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Special-purpose IPv4 blocks not covered by the `Ipv4Addr` predicates.
static RESERVED_V4: LazyLock<Vec<Ipv4Net>> = LazyLock::new(|| {
    [
        "100.64.0.0/10",   // carrier-grade NAT
        "192.0.0.0/24",    // IETF protocol assignments
        "192.0.2.0/24",    // TEST-NET-1
        "198.18.0.0/15",   // benchmarking
        "198.51.100.0/24", // TEST-NET-2
        "203.0.113.0/24",  // TEST-NET-3
        "240.0.0.0/4",     // reserved
    ]
    .iter()
    .map(|cidr| cidr.parse().expect("valid IPv4 CIDR literal"))
    .collect()
});

/// Special-purpose IPv6 blocks not covered by the `Ipv6Addr` predicates.
static RESERVED_V6: LazyLock<Vec<Ipv6Net>> = LazyLock::new(|| {
    [
        "fc00::/7",      // unique local
        "fe80::/10",     // link-local
        "100::/64",      // discard-only
        "2001:db8::/32", // documentation
    ]
    .iter()
    .map(|cidr| cidr.parse().expect("valid IPv6 CIDR literal"))
    .collect()
});

/// Error type for SSRF validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SsrfError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("blocked IP: {0} (private/reserved)")]
    BlockedIp(IpAddr),

    #[error("DNS resolution failed: {0}")]
    DnsError(String),

    #[error("DNS resolution returned no addresses for {0}")]
    NoAddresses(String),
}

fn is_reserved_v4(v4: Ipv4Addr) -> bool {
    v4.is_loopback()
        || v4.is_private()
        || v4.is_link_local()
        || v4.is_multicast()
        || v4.is_broadcast()
        || v4.is_unspecified()
        || v4.octets()[0] == 0
        || RESERVED_V4.iter().any(|net| net.contains(&v4))
}

fn is_reserved_v6(v6: Ipv6Addr) -> bool {
    if let Some(mapped) = v6.to_ipv4_mapped() {
        return is_reserved_v4(mapped);
    }
    v6.is_loopback() || v6.is_multicast() || v6.is_unspecified() || RESERVED_V6.iter().any(|net| net.contains(&v6))
}

/// Check if an IP address is private, reserved, or otherwise blocked.
///
/// This covers:
/// - Loopback addresses (127.0.0.0/8, ::1)
/// - RFC 1918 private ranges (10/8, 172.16/12, 192.168/16)
/// - Link-local addresses (169.254/16, fe80::/10)
/// - Multicast addresses (224/4, ff00::/8)
/// - Unspecified and "this network" addresses (0.0.0.0/8, ::)
/// - CGNAT, documentation, benchmarking and reserved IPv4 blocks
/// - IPv6 unique local (fc00::/7) and IPv4-mapped IPv6 by their embedded address
pub fn is_private_or_reserved(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_reserved_v4(v4),
        IpAddr::V6(v6) => is_reserved_v6(v6),
    }
}

/// Validate that an IP address is not private or reserved.
///
/// Returns an error if the IP is blocked.
pub fn validate_ip(ip: IpAddr) -> Result<(), SsrfError> {
    if is_private_or_reserved(ip) { Err(SsrfError::BlockedIp(ip)) } else { Ok(()) }
}

/// The host of `url` when it is an IP literal.
pub fn literal_ip(url: &Url) -> Option<IpAddr> {
    match url.host()? {
        Host::Ipv4(v4) => Some(IpAddr::V4(v4)),
        Host::Ipv6(v6) => Some(IpAddr::V6(v6)),
        Host::Domain(_) => None,
    }
}

/// Resolve the host of `url` and require every answer to be public.
///
/// IP-literal hosts are checked without touching DNS. Domain hosts go
/// through the system resolver, bounded by [`RESOLVE_TIMEOUT`].
pub async fn check_url(url: &Url) -> Result<Vec<IpAddr>, SsrfError> {
    let domain = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(_) => {
            let ip = literal_ip(url).ok_or_else(|| SsrfError::InvalidUrl(url.to_string()))?;
            validate_ip(ip)?;
            return Ok(vec![ip]);
        }
        None => return Err(SsrfError::InvalidUrl(format!("{url}: missing host"))),
    };

    let port = url.port_or_known_default().unwrap_or(443);
    let lookup = tokio::time::timeout(RESOLVE_TIMEOUT, tokio::net::lookup_host((domain.as_str(), port)))
        .await
        .map_err(|_| SsrfError::DnsError(format!("{domain}: timed out after {RESOLVE_TIMEOUT:?}")))?
        .map_err(|e| SsrfError::DnsError(format!("{domain}: {e}")))?;

    let addrs: Vec<IpAddr> = lookup.map(|addr| addr.ip()).collect();
    if addrs.is_empty() {
        return Err(SsrfError::NoAddresses(domain));
    }

    for ip in &addrs {
        validate_ip(*ip)?;
    }

    tracing::debug!(host = %domain, addrs = ?addrs, "host resolved to public addresses");
    Ok(addrs)
}

/// Whether `url` must be refused before any fetch is attempted.
///
/// Returns `true` for private/loopback/link-local targets and for anything
/// that fails to parse or resolve.
pub async fn is_private_host(url: &str) -> bool {
    let parsed = match canonicalize(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(url, error = %e, "treating unparsable URL as private");
            return true;
        }
    };

    match check_url(&parsed).await {
        Ok(_) => false,
        Err(e) => {
            tracing::debug!(url, error = %e, "host rejected by SSRF guard");
            true
        }
    }
}
