//! Request metadata extraction.
//!
//! `X-Forwarded-For` is only honoured when the gateway is configured to sit
//! behind a proxy that appends to it. The rightmost entry is the one the
//! proxy added; anything left of it is client-controlled.

use axum::http::{header, HeaderMap};
use response_ingest::RequestMeta;
use std::net::{IpAddr, SocketAddr};
use tracing::debug;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client IP for the record and error reports.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> Option<String> {
    if trust_forwarded_for {
        if let Some(value) = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(ip) = value
                .rsplit(',')
                .next()
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
            {
                debug!(extracted_ip = %ip, "Client IP from forwarded header");
                return Some(ip.to_string());
            }
        }
    }

    peer.map(|addr| addr.ip().to_string())
}

/// Build the metadata passed through to the ingest pipeline.
pub fn request_meta(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> RequestMeta {
    RequestMeta {
        source_ip: client_ip(headers, peer, trust_forwarded_for),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}
