//! One-shot messages that survive a redirect.
//!
//! Messages are stored as a url-encoded JSON list in the `flash` cookie and
//! removed by the first page that reads them.

use axum_extra::extract::cookie::{Cookie, CookieJar};

pub const FLASH_COOKIE: &str = "flash";

pub fn push(jar: CookieJar, messages: Vec<String>) -> CookieJar {
    if messages.is_empty() {
        return jar;
    }

    let mut pending = peek(&jar);
    pending.extend(messages);

    let encoded = serde_json::Value::from(pending).to_string();
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(&encoded).into_owned()))
        .path("/")
        .http_only(true);
    jar.add(cookie)
}

fn peek(jar: &CookieJar) -> Vec<String> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };

    urlencoding::decode(cookie.value())
        .ok()
        .and_then(|decoded| serde_json::from_str(&decoded).ok())
        .unwrap_or_else(|| {
            log::debug!("Ignoring malformed flash cookie");
            Vec::new()
        })
}

/// Read pending messages and clear the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    let messages = peek(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}
