//! Unified error handling for the core

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Key used for errors that do not belong to a single form field
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum CoreError {
	/// Submitted form values failed validation
	#[error("Validation failed: {0}")]
	Validation(FormErrors),

	#[error("{entity} not found: {key}")]
	NotFound { entity: &'static str, key: String },

	/// Every generated folio collided with an existing order
	#[error("Could not generate a unique folio after {attempts} attempts")]
	FolioExhausted { attempts: usize },

	#[error("Authentication failed: {0}")]
	Auth(#[from] AuthError),

	#[error("Database error: {0}")]
	Database(#[from] sea_orm::DbErr),

	#[error("Password hashing error: {0}")]
	PasswordHash(String),
}

impl CoreError {
	pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
		Self::NotFound {
			entity,
			key: key.to_string(),
		}
	}

	/// Shorthand for a validation error on a single field
	pub fn invalid(field: &str, message: impl Into<String>) -> Self {
		let mut errors = FormErrors::default();
		errors.add(field, message);
		Self::Validation(errors)
	}
}

impl From<FormErrors> for CoreError {
	fn from(errors: FormErrors) -> Self {
		Self::Validation(errors)
	}
}

/// Errors raised while signing a user in
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
	#[error("Por favor, introduzca un nombre de usuario y clave correctos.")]
	InvalidCredentials,

	#[error("Solo el superuser puede iniciar sesión.")]
	NotSuperuser,
}

/// Field-level validation messages, keyed by the submitted field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self.0
			.entry(field.to_string())
			.or_default()
			.push(message.into());
	}

	pub fn add_non_field(&mut self, message: impl Into<String>) {
		self.add(NON_FIELD_ERRORS, message);
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn contains(&self, field: &str) -> bool {
		self.0.contains_key(field)
	}

	pub fn get(&self, field: &str) -> Option<&[String]> {
		self.0.get(field).map(Vec::as_slice)
	}

	/// Turn accumulated messages into a validation error, or `Ok` if there are none
	pub fn into_result(self) -> Result<()> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(CoreError::Validation(self))
		}
	}
}

impl std::fmt::Display for FormErrors {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
		write!(f, "invalid fields [{}]", fields.join(", "))
	}
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
