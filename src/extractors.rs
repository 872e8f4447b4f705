use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::flash::{Flash, FLASH_COOKIE};
use crate::state::AppState;

/// Flash message left by the previous request, if any.
/// Never rejects: a missing or forged cookie simply yields `None`.
pub struct IncomingFlash(pub Option<Flash>);

impl FromRequestParts<AppState> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let flash = cookie_value(parts, FLASH_COOKIE).and_then(|v| state.flash_key.decode(v));
        Ok(IncomingFlash(flash))
    }
}

fn cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}
