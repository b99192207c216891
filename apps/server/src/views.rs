//! JSON page models and response helpers shared by the routes

use axum::{
	response::{IntoResponse, Response},
	Json,
};
use axum_extra::extract::CookieJar;
use http::{header, StatusCode};
use serde::Serialize;
use url::{form_urlencoded, Url};
use wraplab_core::domain::{order::WARNING_LIGHTS, AppointmentKind, OrderStatus, ServiceKind};

use crate::flash::{self, FlashMessage};

pub const DASHBOARD_PATH: &str = "/dashboard/";

/// Every page body is wrapped with the flash messages pending for the visitor
#[derive(Debug, Serialize)]
pub struct Page<T> {
	pub messages: Vec<FlashMessage>,
	#[serde(flatten)]
	pub body: T,
}

/// Render `body` with `status`, consuming any flash messages
pub fn render<T: Serialize>(jar: CookieJar, status: StatusCode, body: T) -> Response {
	let (jar, messages) = flash::take(jar);
	(status, jar, Json(Page { messages, body })).into_response()
}

pub fn ok<T: Serialize>(jar: CookieJar, body: T) -> Response {
	render(jar, StatusCode::OK, body)
}

/// Redisplay a form that failed validation
pub fn invalid<T: Serialize>(jar: CookieJar, body: T) -> Response {
	render(jar, StatusCode::UNPROCESSABLE_ENTITY, body)
}

/// `302 Found` to `location`
pub fn found(location: &str) -> Response {
	(StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Redirect after a successful form post, leaving a banner for the next page
pub fn redirect_with(jar: CookieJar, location: &str, message: FlashMessage) -> Response {
	(flash::push(jar, message), found(location)).into_response()
}

pub fn login_path(next: Option<&str>) -> String {
	match next {
		Some(next) => format!(
			"/login/?next={}",
			form_urlencoded::byte_serialize(next.as_bytes()).collect::<String>()
		),
		None => "/login/".to_string(),
	}
}

/// Only same-site absolute paths are followed after login
pub fn safe_next(next: Option<&str>) -> &str {
	match next {
		Some(next) if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') => {
			next
		}
		_ => DASHBOARD_PATH,
	}
}

/// Path of the public tracking page for `folio`, percent-encoded
pub fn tracking_path(folio: &str) -> String {
	let Ok(mut url) = Url::parse("http://localhost/") else {
		return format!("/seguimiento/{folio}/");
	};
	if let Ok(mut segments) = url.path_segments_mut() {
		segments.clear().push("seguimiento").push(folio).push("");
	}
	url.path().to_string()
}

pub fn order_path(order_id: i32) -> String {
	format!("/dashboard/{order_id}/")
}

/// A `<select>` option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
	pub value: &'static str,
	pub label: &'static str,
}

pub fn service_choices() -> Vec<Choice> {
	ServiceKind::ALL
		.iter()
		.map(|kind| Choice {
			value: kind.code(),
			label: kind.label(),
		})
		.collect()
}

pub fn status_choices() -> Vec<Choice> {
	OrderStatus::ALL
		.iter()
		.map(|status| Choice {
			value: status.code(),
			label: status.label(),
		})
		.collect()
}

pub fn warning_light_choices() -> Vec<Choice> {
	WARNING_LIGHTS
		.iter()
		.map(|&(value, label)| Choice { value, label })
		.collect()
}

pub fn appointment_kind_choices() -> Vec<Choice> {
	AppointmentKind::ALL
		.iter()
		.map(|kind| Choice {
			value: kind.code(),
			label: kind.label(),
		})
		.collect()
}
