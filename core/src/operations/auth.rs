//! Staff accounts and login sessions.
//!
//! Only superusers may sign in. Sessions live in the database and are
//! identified by a random token the server hands out as a cookie.

use crate::common::errors::{AuthError, CoreError, FormErrors, Result};
use crate::common::forms;
use crate::infrastructure::database::entities::{session, user, Session, User};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use sea_orm::{
	ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use tracing::{debug, info, warn};

pub const SESSION_TOKEN_LENGTH: usize = 48;
pub const MAX_USERNAME_LENGTH: usize = 150;

pub fn hash_password(password: &str) -> Result<String> {
	let mut salt = [0u8; 16];
	rand::thread_rng().fill_bytes(&mut salt);
	let salt = SaltString::encode_b64(&salt).map_err(|e| CoreError::PasswordHash(e.to_string()))?;

	Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| CoreError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(stored) else {
		return false;
	};
	Argon2::default()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok()
}

pub async fn create_user(
	db: &DatabaseConnection,
	username: &str,
	password: &str,
	is_superuser: bool,
) -> Result<user::Model> {
	let mut errors = FormErrors::default();
	let username = forms::required_text(&mut errors, "username", username, MAX_USERNAME_LENGTH);
	if password.is_empty() {
		errors.add("password", forms::REQUIRED);
	}
	errors.into_result()?;
	let Some(username) = username else {
		return Err(CoreError::invalid("username", forms::REQUIRED));
	};

	if find_user(db, &username).await?.is_some() {
		return Err(CoreError::invalid(
			"username",
			"Ya existe un usuario con este nombre.",
		));
	}

	let model = user::ActiveModel {
		username: Set(username),
		password_hash: Set(hash_password(password)?),
		is_superuser: Set(is_superuser),
		is_active: Set(true),
		created_at: Set(Utc::now()),
		last_login_at: Set(None),
		..Default::default()
	}
	.insert(db)
	.await?;

	info!(user_id = model.id, is_superuser, "Created user {}", model.username);
	Ok(model)
}

pub async fn find_user(db: &DatabaseConnection, username: &str) -> Result<Option<user::Model>> {
	Ok(User::find()
		.filter(user::Column::Username.eq(username))
		.one(db)
		.await?)
}

/// Verify credentials for a staff login.
///
/// Unknown users, inactive accounts and wrong passwords all fail with
/// [`AuthError::InvalidCredentials`]; valid credentials of a non-superuser fail
/// with [`AuthError::NotSuperuser`].
pub async fn authenticate(
	db: &DatabaseConnection,
	username: &str,
	password: &str,
) -> Result<user::Model> {
	let username = username.trim();
	let Some(user) = find_user(db, username).await? else {
		warn!("Rejected login for unknown user {:?}", username);
		return Err(AuthError::InvalidCredentials.into());
	};

	if !user.is_active || !verify_password(password, &user.password_hash) {
		warn!(user_id = user.id, "Rejected login with bad credentials");
		return Err(AuthError::InvalidCredentials.into());
	}

	if !user.is_superuser {
		warn!(user_id = user.id, "Rejected login of non-superuser {}", user.username);
		return Err(AuthError::NotSuperuser.into());
	}

	let mut active: user::ActiveModel = user.into();
	active.last_login_at = Set(Some(Utc::now()));
	let user = active.update(db).await?;
	info!(user_id = user.id, "User {} signed in", user.username);
	Ok(user)
}

fn new_token() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(SESSION_TOKEN_LENGTH)
		.map(char::from)
		.collect()
}

pub async fn start_session(
	db: &DatabaseConnection,
	user: &user::Model,
	ttl: Duration,
) -> Result<session::Model> {
	let now = Utc::now();
	let model = session::ActiveModel {
		token: Set(new_token()),
		user_id: Set(user.id),
		created_at: Set(now),
		expires_at: Set(now + ttl),
	}
	.insert(db)
	.await?;

	debug!(user_id = user.id, expires_at = %model.expires_at, "Started session");
	Ok(model)
}

/// User behind a session token. Expired sessions are deleted and, like
/// unknown tokens and deactivated users, yield `None`.
pub async fn session_user(
	db: &DatabaseConnection,
	token: &str,
	now: DateTime<Utc>,
) -> Result<Option<user::Model>> {
	let Some((session, user)) = Session::find_by_id(token.to_string())
		.find_also_related(User)
		.one(db)
		.await?
	else {
		return Ok(None);
	};

	if session.expires_at <= now {
		debug!(user_id = session.user_id, "Session expired");
		session.delete(db).await?;
		return Ok(None);
	}

	Ok(user.filter(|user| user.is_active))
}

pub async fn end_session(db: &DatabaseConnection, token: &str) -> Result<()> {
	let result = Session::delete_by_id(token.to_string()).exec(db).await?;
	if result.rows_affected > 0 {
		debug!("Ended session");
	}
	Ok(())
}

/// Drop every session past its expiry; returns how many were removed
pub async fn purge_expired_sessions(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<u64> {
	let result = Session::delete_many()
		.filter(session::Column::ExpiresAt.lte(now))
		.exec(db)
		.await?;
	if result.rows_affected > 0 {
		info!(purged = result.rows_affected, "Purged expired sessions");
	}
	Ok(result.rows_affected)
}
