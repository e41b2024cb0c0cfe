//! SSRF guard for user-supplied webhook URLs.
//!
//! Resolves hostnames and rejects private, loopback, link-local, CGNAT,
//! metadata, and otherwise reserved addresses so the alert dispatcher can
//! never be pointed at internal infrastructure. Applied at monitor
//! creation/update and again before test-sends.

use crate::errors::ServiceError;
use reqwest::Url;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tokio::net::lookup_host;

/// Hostnames that must never be fetched regardless of what DNS says
const BLOCKED_HOSTNAMES: &[&str] = &["localhost", "metadata.google.internal", "instance-data"];

pub fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    ip.is_private()                                       // 10/8, 172.16/12, 192.168/16
        || ip.is_loopback()                               // 127/8
        || ip.is_link_local()                             // 169.254/16 (cloud metadata)
        || ip.is_multicast()                              // 224/4
        || ip.is_broadcast()                              // 255.255.255.255
        || ip.is_unspecified()
        || octets[0] == 0                                 // "this network"
        || (octets[0] == 100 && (64..=127).contains(&octets[1])) // CGNAT 100.64/10
        || (octets[0] == 198 && (octets[1] == 18 || octets[1] == 19)) // benchmarking
        || (octets[0] == 203 && octets[1] == 0 && octets[2] == 113)   // documentation
        || octets[0] >= 240                               // reserved / broadcast
}

pub fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }
    // IPv4-mapped addresses inherit the IPv4 verdict
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_private_ipv4(v4);
    }
    let segments = ip.segments();
    // fe80::/10 link-local
    if (segments[0] & 0xffc0) == 0xfe80 {
        return true;
    }
    // fc00::/7 unique local
    if (segments[0] & 0xfe00) == 0xfc00 {
        return true;
    }
    false
}

pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_ipv4(v4),
        IpAddr::V6(v6) => is_private_ipv6(v6),
    }
}

/// Validates that a webhook URL is http/https and does not target
/// internal infrastructure. Resolves DNS for hostnames and checks every
/// returned address.
pub async fn validate_webhook_url(url_str: &str) -> Result<(), ServiceError> {
    let url = Url::parse(url_str)
        .map_err(|_| ServiceError::invalid("Invalid webhook URL"))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(ServiceError::invalid(
                "Only http and https webhook URLs are supported",
            ))
        }
    }

    let host = url
        .host_str()
        .ok_or_else(|| ServiceError::invalid("Webhook URL has no host"))?;

    // Raw IP literals are checked without a DNS round trip
    if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
        if is_private_ip(ip) {
            return Err(ServiceError::invalid(format!(
                "Blocked: {} is a private/internal address",
                host
            )));
        }
        return Ok(());
    }

    if BLOCKED_HOSTNAMES.contains(&host.to_ascii_lowercase().as_str()) {
        return Err(ServiceError::invalid(format!(
            "Blocked: {} is a reserved internal hostname",
            host
        )));
    }

    let port = url.port_or_known_default().unwrap_or(443);
    let addrs: Vec<IpAddr> = lookup_host((host, port))
        .await
        .map_err(|e| ServiceError::invalid(format!("DNS resolution failed for {}: {}", host, e)))?
        .map(|sock| sock.ip())
        .collect();

    if addrs.is_empty() {
        return Err(ServiceError::invalid(format!(
            "Blocked: {} could not be resolved",
            host
        )));
    }

    for ip in addrs {
        if is_private_ip(ip) {
            return Err(ServiceError::invalid(format!(
                "Blocked: {} resolves to private IP {}",
                host, ip
            )));
        }
    }

    Ok(())
}
