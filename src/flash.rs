//! One-shot messages carried across a redirect in a signed cookie.
//!
//! The cookie value is `hex(json) "." hex(mac)`, where the MAC is a keyed
//! BLAKE3 hash under a key derived from the configured secret. Anything that
//! fails to parse or verify is treated as "no message".

use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "confessions_flash";

const KEY_CONTEXT: &str = "confessions flash cookie v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// CSS class used by the templates.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Success => "flash flash-success",
            Level::Error => "flash flash-error",
        }
    }
}

#[derive(Clone)]
pub struct FlashKey([u8; 32]);

impl std::fmt::Debug for FlashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FlashKey(..)")
    }
}

impl FlashKey {
    pub fn derive(secret: &str) -> Self {
        Self(blake3::derive_key(KEY_CONTEXT, secret.as_bytes()))
    }

    pub fn encode(&self, flash: &Flash) -> String {
        // Serializing a two-field struct of plain strings cannot fail
        let payload = serde_json::to_vec(flash).unwrap_or_default();
        let mac = blake3::keyed_hash(&self.0, &payload);
        format!("{}.{}", hex::encode(&payload), mac.to_hex())
    }

    pub fn decode(&self, value: &str) -> Option<Flash> {
        let (payload_hex, mac_hex) = value.split_once('.')?;
        let payload = hex::decode(payload_hex).ok()?;
        let mac: [u8; 32] = hex::decode(mac_hex).ok()?.try_into().ok()?;

        // blake3::Hash equality is constant-time
        if blake3::keyed_hash(&self.0, &payload) != blake3::Hash::from(mac) {
            tracing::debug!("Ignoring flash cookie with bad signature");
            return None;
        }
        serde_json::from_slice(&payload).ok()
    }

    pub fn set_cookie(&self, flash: &Flash) -> String {
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/",
            FLASH_COOKIE,
            self.encode(flash)
        )
    }
}

pub fn clear_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", FLASH_COOKIE)
}

/// `303 See Other` to `to`, leaving `flash` for the next page.
pub fn redirect_with(key: &FlashKey, to: &str, flash: Flash) -> Response {
    (
        [(header::SET_COOKIE, key.set_cookie(&flash))],
        Redirect::to(to),
    )
        .into_response()
}
