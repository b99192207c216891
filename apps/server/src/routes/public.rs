//! Pages anyone can open: landing, health check and order tracking

use axum::{
	extract::{Path, Query, State},
	response::Response,
	routing::get,
	Router,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use wraplab_core::operations::lookup::{self, normalize_folio};

use crate::{error::AppResult, state::AppState, views};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(index))
		.route("/health", get(|| async { "OK" }))
		.route("/seguimiento/", get(tracking_lookup))
		.route("/seguimiento/:folio/", get(tracking_detail))
}

#[derive(Serialize)]
struct IndexPage {
	name: &'static str,
	tracking_url: &'static str,
}

async fn index(jar: CookieJar) -> Response {
	views::ok(
		jar,
		IndexPage {
			name: "WrapLab",
			tracking_url: "/seguimiento/",
		},
	)
}

#[derive(Deserialize)]
struct LookupQuery {
	folio: Option<String>,
}

#[derive(Serialize)]
struct LookupPage {
	folio: String,
}

/// Lookup form; a submitted folio jumps straight to its tracking page
async fn tracking_lookup(jar: CookieJar, Query(query): Query<LookupQuery>) -> Response {
	let folio = normalize_folio(query.folio.as_deref().unwrap_or_default());
	if folio.is_empty() {
		return views::ok(jar, LookupPage { folio });
	}
	views::found(&views::tracking_path(&folio))
}

async fn tracking_detail(
	State(state): State<AppState>,
	jar: CookieJar,
	Path(folio): Path<String>,
) -> AppResult<Response> {
	let view = lookup::lookup(state.conn(), &folio).await?;
	Ok(views::ok(jar, view))
}
