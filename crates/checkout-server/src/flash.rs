//! Flash Messages
//!
//! One-shot messages carried across a redirect in a `flash` cookie. The
//! value is a base64url-encoded JSON array of strings.

use axum::http::{HeaderMap, header::COOKIE};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

const COOKIE_NAME: &str = "flash";

/// `Set-Cookie` value that removes the flash cookie
pub const CLEAR_COOKIE: &str = "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

/// `Set-Cookie` value carrying `messages`
pub fn set_cookie(messages: &[String]) -> String {
    let json = serde_json::to_vec(messages).unwrap_or_default();
    format!(
        "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
        URL_SAFE_NO_PAD.encode(json)
    )
}

/// Messages in the request's flash cookie; malformed values are ignored
pub fn read(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("flash="))
        .filter(|value| !value.is_empty())
        .filter_map(|value| URL_SAFE_NO_PAD.decode(value).ok())
        .filter_map(|bytes| serde_json::from_slice::<Vec<String>>(&bytes).ok())
        .flatten()
        .collect()
}
