//! One-shot banners carried across a redirect in a cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const FLASH_COOKIE: &str = "wraplab_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
	pub level: Level,
	pub text: String,
}

impl FlashMessage {
	pub fn success(text: impl Into<String>) -> Self {
		Self {
			level: Level::Success,
			text: text.into(),
		}
	}
}

fn decode(value: &str) -> Vec<FlashMessage> {
	URL_SAFE_NO_PAD
		.decode(value)
		.ok()
		.and_then(|bytes| serde_json::from_slice(&bytes).ok())
		.unwrap_or_else(|| {
			debug!("Discarding unreadable flash cookie");
			Vec::new()
		})
}

fn encode(messages: &[FlashMessage]) -> String {
	// Serializing plain strings and enums cannot fail
	URL_SAFE_NO_PAD.encode(serde_json::to_vec(messages).unwrap_or_default())
}

/// Queue `message` for the next page the browser loads
pub fn push(jar: CookieJar, message: FlashMessage) -> CookieJar {
	let mut messages = jar
		.get(FLASH_COOKIE)
		.map(|cookie| decode(cookie.value()))
		.unwrap_or_default();
	messages.push(message);

	let cookie = Cookie::build((FLASH_COOKIE, encode(&messages)))
		.path("/")
		.http_only(true)
		.same_site(SameSite::Lax);
	jar.add(cookie)
}

/// Consume pending messages, clearing the cookie
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
	let Some(cookie) = jar.get(FLASH_COOKIE) else {
		return (jar, Vec::new());
	};
	let messages = decode(cookie.value());
	let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
	(jar, messages)
}
