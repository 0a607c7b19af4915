/// One-shot status messages between requests
///
/// Every successful mutation redirects, and the message the user should
/// see lands in a short-lived cookie that the next rendered page reads
/// and clears. The payload is JSON, hex-encoded so it stays inside the
/// cookie value grammar.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "flash";

/// Message severity, mapped to a CSS class when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Info => "info",
            FlashKind::Warning => "warning",
            FlashKind::Danger => "danger",
        }
    }
}

/// A transient status message shown on the next rendered page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }

    pub fn success(message: &str) -> Self {
        Self::new(FlashKind::Success, message)
    }

    pub fn info(message: &str) -> Self {
        Self::new(FlashKind::Info, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new(FlashKind::Warning, message)
    }

    pub fn danger(message: &str) -> Self {
        Self::new(FlashKind::Danger, message)
    }
}

/// Queues a flash message for the next rendered page
pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    // Messages are server-defined strings, so serialization cannot fail
    let payload = serde_json::to_vec(&flash).unwrap_or_default();

    let cookie = Cookie::build((FLASH_COOKIE, hex::encode(payload)))
        .path("/")
        .http_only(true)
        .build();

    jar.add(cookie)
}

/// Takes the pending flash message, clearing the cookie
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    // Unreadable payloads are dropped along with the cookie
    let flash = hex::decode(cookie.value())
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok());

    let removal = Cookie::build((FLASH_COOKIE, "")).path("/").build();
    (jar.remove(removal), flash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_take() {
        let jar = CookieJar::new();
        let jar = set_flash(jar, Flash::success("Task created"));

        let (jar, flash) = take_flash(jar);
        let flash = flash.expect("flash should round-trip");
        assert_eq!(flash.kind, FlashKind::Success);
        assert_eq!(flash.message, "Task created");

        // Cleared after reading
        let (_, again) = take_flash(jar);
        assert!(again.is_none());
    }

    #[test]
    fn test_garbage_cookie_yields_nothing() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "zz-not-hex"));
        let (_, flash) = take_flash(jar);
        assert!(flash.is_none());
    }

    #[test]
    fn test_payload_survives_cookie_grammar() {
        // Messages contain spaces and punctuation; the encoded value
        // must not
        let jar = set_flash(CookieJar::new(), Flash::warning("Invalid or expired link!"));
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
