use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE: &str = "token";

/// One year. Deliberately independent of the token's own `exp`.
pub const SESSION_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// `Set-Cookie` value carrying the session token.
///
/// Browsers drop `SameSite=None` cookies that lack `Secure`, so both are
/// always sent regardless of deployment mode.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Max-Age={SESSION_COOKIE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=None; Secure"
    )
}

/// Session token from the `token` cookie, falling back to `Authorization: Bearer`.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value);

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|auth| {
                auth.strip_prefix("Bearer ")
                    .or_else(|| auth.strip_prefix("bearer "))
            })
    })
}
