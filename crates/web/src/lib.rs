use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use http::HeaderMap;

pub mod response;

/// Resolves the caller address, preferring proxy headers over the socket
/// peer address.
#[must_use]
pub fn get_request_ip(headers: &HeaderMap, addr: &SocketAddr) -> IpAddr {
    let x_forwarded_for = first_ip_in_header(headers, "X-Forwarded-For");
    let x_real_ip = first_ip_in_header(headers, "X-Real-IP");

    tracing::debug!(?x_forwarded_for, ?x_real_ip, ip_address = ?addr.ip());

    x_forwarded_for.or(x_real_ip).unwrap_or_else(|| addr.ip())
}

fn first_ip_in_header(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.split(',').next().map(str::trim).and_then(|ip| IpAddr::from_str(ip).ok()))
}
