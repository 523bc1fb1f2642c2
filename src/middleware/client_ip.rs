//! Client identification for logging.

use actix_web::HttpRequest;

use crate::config::FORWARDED_FOR_HEADER;

/// Resolve the client identifier of a request.
///
/// The raw `X-Forwarded-For` value wins when present and non-empty, otherwise
/// the peer address is used. Never use this for access control.
pub fn client_identifier(req: &HttpRequest) -> String {
    req.headers()
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .or_else(|| req.peer_addr().map(|addr| addr.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
