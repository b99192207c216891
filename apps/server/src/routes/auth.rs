//! Staff sign-in and sign-out

use axum::{
	extract::{Query, State},
	response::{IntoResponse, Response},
	routing::{get, post},
	Form, Router,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;
use wraplab_core::{common::errors::NON_FIELD_ERRORS, operations::auth, CoreError, FormErrors};

use crate::{
	error::AppResult,
	session::{clear_session_cookie, session_cookie, CurrentUser, SESSION_COOKIE},
	state::AppState,
	views,
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/login/", get(login_page).post(login))
		.route("/logout/", post(logout))
}

#[derive(Debug, Default, Deserialize)]
struct NextQuery {
	next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginForm {
	username: String,
	password: String,
	next: Option<String>,
}

#[derive(Serialize)]
struct LoginPage {
	username: String,
	next: Option<String>,
	errors: FormErrors,
}

async fn login_page(
	current: CurrentUser,
	jar: CookieJar,
	Query(query): Query<NextQuery>,
) -> Response {
	if current.is_staff() {
		return views::found(views::DASHBOARD_PATH);
	}
	views::ok(
		jar,
		LoginPage {
			username: String::new(),
			next: query.next,
			errors: FormErrors::default(),
		},
	)
}

async fn login(
	State(state): State<AppState>,
	jar: CookieJar,
	Form(form): Form<LoginForm>,
) -> AppResult<Response> {
	let user = match auth::authenticate(state.conn(), &form.username, &form.password).await {
		Ok(user) => user,
		Err(CoreError::Auth(err)) => {
			let mut errors = FormErrors::default();
			errors.add(NON_FIELD_ERRORS, err.to_string());
			return Ok(views::invalid(
				jar,
				LoginPage {
					username: form.username,
					next: form.next,
					errors,
				},
			));
		}
		Err(err) => return Err(err.into()),
	};

	let session = auth::start_session(state.conn(), &user, state.session_ttl()).await?;
	let jar = jar.add(session_cookie(session.token, &state));
	let location = views::safe_next(form.next.as_deref());
	Ok((jar, views::found(location)).into_response())
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
	if let Some(token) = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()) {
		auth::end_session(state.conn(), &token).await?;
		info!("Session ended by logout");
	}
	Ok((clear_session_cookie(jar), views::found("/")).into_response())
}
