//! Best-effort client address resolution behind reverse proxies.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Fallback key when no header or peer address yields anything.
const UNKNOWN_CLIENT: &str = "unknown";

/// Resolves the client address for rate-limit keying.
///
/// Precedence, first present wins:
/// 1. the deployment's trusted proxy header (`TRUSTED_PROXY_HEADER`)
/// 2. `X-Real-IP`
/// 3. first hop of `X-Forwarded-For`
/// 4. the transport-level peer address
///
/// The trusted header goes first because any header an untrusted client can
/// set is a rate-limit bypass; which header the proxy actually controls is a
/// deployment fact, so it is configured rather than guessed.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_header: Option<&str>,
) -> String {
    if let Some(name) = trusted_header {
        if let Some(value) = header_str(headers, name) {
            return value.to_string();
        }
    }

    if let Some(value) = header_str(headers, "x-real-ip") {
        return value.to_string();
    }

    // X-Forwarded-For lists client, proxy1, proxy2, ... — take the first hop.
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
