//! IP allowlist matching.
//!
//! Allowlist entries are either a single address (`10.0.0.1`) or a CIDR range
//! (`192.168.1.0/24`, `fd00::/8`).  The matcher compares the leading
//! `prefix / 8` bytes exactly and then the top `prefix % 8` bits of the next
//! byte:
//!
//! ```text
//! 192.168.1.0/22  ->  bytes [192, 168] exact, then byte 2 masked with 0xFC
//! ```
//!
//! # Failure policy
//!
//! Allowlist checks sit on the request path of every API call, so a bad entry
//! must never take the server down.  Any entry that cannot be parsed (bad
//! address, bad prefix, prefix too long for the family, IPv4 entry against an
//! IPv6 requester) simply does not match.

use std::net::IpAddr;

use tracing::debug;

/// Returns `true` if `ip` is covered by the allowlist entry `spec`.
///
/// Entries without a `/` are compared as exact addresses.
///
/// # Examples
///
/// ```rust
/// use std::net::IpAddr;
/// use wol_core::cidr::matches;
///
/// let ip: IpAddr = "192.168.1.50".parse().unwrap();
/// assert!(matches(ip, "192.168.1.0/24"));
/// assert!(!matches(ip, "192.168.2.0/24"));
/// assert!(!matches(ip, "not-a-cidr/40"));
/// ```
pub fn matches(ip: IpAddr, spec: &str) -> bool {
    let spec = spec.trim();
    let result = match spec.split_once('/') {
        None => spec.parse::<IpAddr>().ok().map(|exact| exact == ip),
        Some((network, prefix)) => prefix_matches(ip, network, prefix),
    };

    result.unwrap_or_else(|| {
        debug!("allowlist entry {spec:?} is malformed; treating as non-match");
        false
    })
}

/// Returns `true` if `allowlist` is empty or any entry matches `ip`.
///
/// Entries are checked in order and the scan stops at the first match.
pub fn is_allowed(ip: IpAddr, allowlist: &[String]) -> bool {
    allowlist.is_empty() || allowlist.iter().any(|spec| matches(ip, spec))
}

/// Compares `ip` with `network/prefix`.  `None` means the entry is malformed.
fn prefix_matches(ip: IpAddr, network: &str, prefix: &str) -> Option<bool> {
    let network: IpAddr = network.trim().parse().ok()?;
    let prefix: usize = prefix.trim().parse().ok()?;

    let (network_bytes, ip_bytes): (Vec<u8>, Vec<u8>) = match (network, ip) {
        (IpAddr::V4(n), IpAddr::V4(i)) => (n.octets().to_vec(), i.octets().to_vec()),
        (IpAddr::V6(n), IpAddr::V6(i)) => (n.octets().to_vec(), i.octets().to_vec()),
        // Family mismatch is a non-match, not a malformed entry.
        _ => return Some(false),
    };

    if prefix > network_bytes.len() * 8 {
        return None;
    }

    let whole_bytes = prefix / 8;
    let remaining_bits = prefix % 8;

    if network_bytes[..whole_bytes] != ip_bytes[..whole_bytes] {
        return Some(false);
    }

    if remaining_bits > 0 {
        // `remaining_bits > 0` implies `whole_bytes` indexes a real byte.
        let mask = 0xFFu8 << (8 - remaining_bits);
        return Some(network_bytes[whole_bytes] & mask == ip_bytes[whole_bytes] & mask);
    }

    Some(true)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
