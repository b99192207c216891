//! Session cookie handling and the staff capability check

use async_trait::async_trait;
use axum::{
	extract::FromRequestParts,
	response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use http::request::Parts;
use wraplab_core::{infrastructure::database::entities::user, operations::auth};

use crate::{error::AppError, state::AppState, views};

pub const SESSION_COOKIE: &str = "wraplab_session";

/// Signed-in user, if any. Expired or unknown tokens count as anonymous.
pub struct CurrentUser(pub Option<user::Model>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
	type Rejection = AppError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let jar = CookieJar::from_headers(&parts.headers);
		let Some(token) = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()) else {
			return Ok(Self(None));
		};
		let user = auth::session_user(state.conn(), &token, Utc::now()).await?;
		Ok(Self(user))
	}
}

impl CurrentUser {
	pub fn is_staff(&self) -> bool {
		self.0.as_ref().is_some_and(|user| user.is_superuser)
	}
}

/// The single gate in front of every staff route: an active superuser with a
/// live session. Anyone else is sent to the login page, keeping the path they
/// asked for in `next`.
pub struct StaffUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let CurrentUser(user) = CurrentUser::from_request_parts(parts, state)
			.await
			.map_err(IntoResponse::into_response)?;

		match user {
			Some(user) if user.is_superuser => Ok(Self(user)),
			_ => {
				let next = parts
					.uri
					.path_and_query()
					.map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());
				Err(views::found(&views::login_path(Some(&next))))
			}
		}
	}
}

/// Browser-session cookie; expiry is enforced server side
pub fn session_cookie(token: String, state: &AppState) -> Cookie<'static> {
	Cookie::build((SESSION_COOKIE, token))
		.path("/")
		.http_only(true)
		.secure(state.config.server.secure_cookies)
		.same_site(SameSite::Lax)
		.build()
}

pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
	jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
