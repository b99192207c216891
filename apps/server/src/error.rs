use axum::{
	response::{IntoResponse, Response},
	Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use wraplab_core::CoreError;

/// Handler error, rendered as a JSON body
#[derive(Debug, Error)]
pub enum AppError {
	#[error(transparent)]
	Core(#[from] CoreError),
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		match self {
			AppError::Core(CoreError::NotFound { entity, key }) => (
				StatusCode::NOT_FOUND,
				Json(json!({ "error": format!("{entity} {key} no encontrado.") })),
			)
				.into_response(),
			AppError::Core(CoreError::Validation(errors)) => (
				StatusCode::UNPROCESSABLE_ENTITY,
				Json(json!({ "errors": errors })),
			)
				.into_response(),
			AppError::Core(CoreError::Auth(err)) => (
				StatusCode::FORBIDDEN,
				Json(json!({ "error": err.to_string() })),
			)
				.into_response(),
			AppError::Core(err) => {
				error!("Request failed: {}", err);
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Json(json!({ "error": "Error interno del servidor." })),
				)
					.into_response()
			}
		}
	}
}

pub type AppResult<T> = Result<T, AppError>;
