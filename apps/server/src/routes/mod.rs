use axum::{response::IntoResponse, Json, Router};
use http::StatusCode;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod appointments;
mod auth;
mod dashboard;
mod public;

pub fn router(state: AppState) -> Router {
	Router::new()
		.merge(public::routes())
		.merge(auth::routes())
		.merge(dashboard::routes())
		.merge(appointments::routes())
		.fallback(not_found)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn not_found() -> impl IntoResponse {
	(
		StatusCode::NOT_FOUND,
		Json(json!({ "error": "Página no encontrada." })),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::{to_bytes, Body};
	use http::{header, Request, Response};
	use serde_json::Value;
	use tower::ServiceExt;
	use wraplab_core::{
		operations::{auth as core_auth, orders, progress},
		AppConfig, Database,
	};

	use crate::session::SESSION_COOKIE;

	async fn app() -> (Router, AppState) {
		let db = Database::in_memory().await.unwrap();
		let config = AppConfig::default_with_dir(std::path::PathBuf::from("."));
		let state = AppState::new(db, config);
		(router(state.clone()), state)
	}

	/// Session cookie header for a freshly created user
	async fn signed_in(state: &AppState, superuser: bool) -> String {
		let user = core_auth::create_user(state.conn(), "staff", "s3creta", superuser)
			.await
			.unwrap();
		let session = core_auth::start_session(state.conn(), &user, state.session_ttl())
			.await
			.unwrap();
		format!("{SESSION_COOKIE}={}", session.token)
	}

	fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
		let mut request = Request::builder().uri(uri);
		if let Some(cookie) = cookie {
			request = request.header(header::COOKIE, cookie);
		}
		request.body(Body::empty()).unwrap()
	}

	fn post(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
		let mut request = Request::builder()
			.method("POST")
			.uri(uri)
			.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
		if let Some(cookie) = cookie {
			request = request.header(header::COOKIE, cookie);
		}
		request.body(Body::from(body.to_string())).unwrap()
	}

	fn location(response: &Response<Body>) -> &str {
		response
			.headers()
			.get(header::LOCATION)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default()
	}

	fn set_cookies(response: &Response<Body>) -> Vec<String> {
		response
			.headers()
			.get_all(header::SET_COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok().map(str::to_string))
			.collect()
	}

	async fn json(response: Response<Body>) -> Value {
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		serde_json::from_slice(&bytes).unwrap()
	}

	async fn seeded_order(state: &AppState) -> wraplab_core::infrastructure::database::entities::order::Model {
		orders::create_order(
			state.conn(),
			&orders::OrderForm {
				client_name: "Cliente".to_string(),
				vehicle_make: "Ferrari".to_string(),
				vehicle_model: "Roma".to_string(),
				vehicle_year: "2024".to_string(),
				vehicle_color: "Rojo".to_string(),
				..Default::default()
			},
		)
		.await
		.unwrap()
	}

	#[tokio::test]
	async fn health_and_unknown_routes() {
		let (app, _) = app().await;

		let response = app.clone().oneshot(get("/health", None)).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		assert_eq!(&body[..], b"OK");

		let response = app.oneshot(get("/nada/", None)).await.unwrap();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn anonymous_staff_access_redirects_to_login() {
		let (app, _) = app().await;

		for uri in ["/dashboard/", "/dashboard/nuevo/", "/dashboard/1/", "/dashboard/citas/nueva/"] {
			let response = app.clone().oneshot(get(uri, None)).await.unwrap();
			assert_eq!(response.status(), StatusCode::FOUND, "{uri}");
			assert!(location(&response).starts_with("/login/?next="), "{uri}");
		}

		let response = app.oneshot(get("/dashboard/?q=rojo", None)).await.unwrap();
		assert_eq!(location(&response), "/login/?next=%2Fdashboard%2F%3Fq%3Drojo");
	}

	#[tokio::test]
	async fn non_superuser_session_is_not_staff() {
		let (app, state) = app().await;
		let cookie = signed_in(&state, false).await;

		let response = app.oneshot(get("/dashboard/", Some(&cookie))).await.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
	}

	#[tokio::test]
	async fn non_superuser_login_is_refused_without_session() {
		let (app, state) = app().await;
		core_auth::create_user(state.conn(), "mecanico", "s3creta", false)
			.await
			.unwrap();

		let response = app
			.oneshot(post("/login/", None, "username=mecanico&password=s3creta"))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		assert!(!set_cookies(&response)
			.iter()
			.any(|cookie| cookie.starts_with(SESSION_COOKIE)));
		let body = json(response).await;
		assert_eq!(
			body["errors"]["__all__"][0],
			"Solo el superuser puede iniciar sesión."
		);
	}

	#[tokio::test]
	async fn superuser_login_sets_session_and_follows_next() {
		let (app, state) = app().await;
		core_auth::create_user(state.conn(), "admin", "s3creta", true)
			.await
			.unwrap();

		let response = app
			.clone()
			.oneshot(post(
				"/login/",
				None,
				"username=admin&password=s3creta&next=%2Fdashboard%2Fcitas%2Fnueva%2F",
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(location(&response), "/dashboard/citas/nueva/");
		let session = set_cookies(&response)
			.into_iter()
			.find(|cookie| cookie.starts_with(SESSION_COOKIE))
			.unwrap();
		let cookie = session.split(';').next().unwrap().to_string();

		let response = app.clone().oneshot(get("/dashboard/", Some(&cookie))).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);

		let response = app.clone().oneshot(get("/login/", Some(&cookie))).await.unwrap();
		assert_eq!(location(&response), "/dashboard/");

		let response = app
			.clone()
			.oneshot(post("/logout/", Some(&cookie), ""))
			.await
			.unwrap();
		assert_eq!(location(&response), "/");
		let response = app.oneshot(get("/dashboard/", Some(&cookie))).await.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
	}

	#[tokio::test]
	async fn wrong_password_shows_generic_message() {
		let (app, state) = app().await;
		core_auth::create_user(state.conn(), "admin", "s3creta", true)
			.await
			.unwrap();

		let response = app
			.oneshot(post("/login/", None, "username=admin&password=mal"))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		let body = json(response).await;
		assert_eq!(
			body["errors"]["__all__"][0],
			"Por favor, introduzca un nombre de usuario y clave correctos."
		);
		assert_eq!(body["username"], "admin");
	}

	#[tokio::test]
	async fn public_tracking_by_folio() {
		let (app, state) = app().await;
		let order = seeded_order(&state).await;

		let response = app
			.clone()
			.oneshot(get(&format!("/seguimiento/{}/", order.folio), None))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let body = json(response).await;
		assert_eq!(body["order"]["folio"], order.folio.as_str());
		assert_eq!(body["current_step"], 0);
		assert!(body["order"].get("total_cost").is_none());

		let response = app
			.clone()
			.oneshot(get("/seguimiento/ZZZZZZZZZZ/", None))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);

		let lowercase = format!("/seguimiento/?folio=%20{}%20", order.folio.to_lowercase());
		let response = app.clone().oneshot(get(&lowercase, None)).await.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(location(&response), format!("/seguimiento/{}/", order.folio));

		let response = app.oneshot(get("/seguimiento/?folio=", None)).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn create_order_from_form() {
		let (app, state) = app().await;
		let cookie = signed_in(&state, true).await;

		let body = "cliente_nombre=Ana&vehiculo_marca=Porsche&vehiculo_modelo=911\
			&vehiculo_matricula=&vehiculo_anio=2022&vehiculo_color=Gris&servicio=PPF\
			&estatus=EN_RECEPCION&testigos=abs&testigos=oil&notas=";
		let response = app
			.clone()
			.oneshot(post("/dashboard/nuevo/", Some(&cookie), body))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
		assert!(location(&response).starts_with("/dashboard/"));
		assert!(set_cookies(&response)
			.iter()
			.any(|cookie| cookie.starts_with(crate::flash::FLASH_COOKIE)));

		let response = app
			.oneshot(post("/dashboard/nuevo/", Some(&cookie), "cliente_nombre="))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		let body = json(response).await;
		assert!(body["errors"]["cliente_nombre"].is_array());
		assert_eq!(body["title"], "Nueva orden");
	}

	#[tokio::test]
	async fn detail_form_dispatch() {
		let (app, state) = app().await;
		let cookie = signed_in(&state, true).await;
		let order = seeded_order(&state).await;
		let uri = format!("/dashboard/{}/", order.id);

		let response = app
			.clone()
			.oneshot(post(&uri, Some(&cookie), "submit_avance=1&estatus=EN_RECEPCION&nota="))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		let body = json(response).await;
		assert_eq!(body["failed_form"], "progress");
		assert_eq!(
			body["errors"]["estatus"][0],
			progress::SAME_STATUS
		);

		let response = app
			.clone()
			.oneshot(post(&uri, Some(&cookie), "submit_avance=1&estatus=EN_PROCESO&nota=Lijado"))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(location(&response), uri);

		let response = app
			.clone()
			.oneshot(post(
				&uri,
				Some(&cookie),
				"submit_costos=1&costo_total=1000&monto_pagado=1250.50",
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);

		let response = app
			.clone()
			.oneshot(post(
				&uri,
				Some(&cookie),
				"submit_fotos=1&foto_1=http%3A%2F%2Fa&foto_2=",
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);

		let response = app
			.clone()
			.oneshot(post(&uri, Some(&cookie), "submit_fotos=1&foto_3=nope"))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		let body = json(response).await;
		assert_eq!(body["gallery"][2]["url"], "nope");
		assert!(body["errors"]["foto_3"].is_array());

		let response = app.oneshot(get(&uri, Some(&cookie))).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let body = json(response).await;
		assert_eq!(body["order"]["status"], "EN_PROCESO");
		assert_eq!(body["costs"]["balance_due"], "-250.50");
		assert_eq!(body["gallery"][0]["url"], "http://a");
		assert_eq!(body["progress"].as_array().map(Vec::len), Some(1));
		assert!(body["customer_url"]
			.as_str()
			.is_some_and(|url| url.ends_with(&format!("/seguimiento/{}/", order.folio))));
	}

	#[tokio::test]
	async fn appointment_lifecycle() {
		let (app, state) = app().await;
		let cookie = signed_in(&state, true).await;

		let response = app
			.clone()
			.oneshot(post(
				"/dashboard/citas/nueva/",
				Some(&cookie),
				"cliente_nombre=Laura&cliente_contacto=&fecha=2099-01-10T10%3A30&tipo=SERVICIO&notas=",
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(location(&response), "/dashboard/");

		let response = app
			.clone()
			.oneshot(get("/dashboard/", Some(&cookie)))
			.await
			.unwrap();
		let body = json(response).await;
		let id = body["upcoming_appointments"][0]["id"].as_i64().unwrap();

		let response = app
			.clone()
			.oneshot(get(&format!("/dashboard/citas/{id}/eliminar/"), Some(&cookie)))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);

		let response = app
			.clone()
			.oneshot(post(&format!("/dashboard/citas/{id}/eliminar/"), Some(&cookie), ""))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);

		let response = app
			.oneshot(get(&format!("/dashboard/citas/{id}/editar/"), Some(&cookie)))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn flash_message_shows_once() {
		let (app, state) = app().await;
		let cookie = signed_in(&state, true).await;
		let order = seeded_order(&state).await;
		let uri = format!("/dashboard/{}/", order.id);

		let response = app
			.clone()
			.oneshot(post(&uri, Some(&cookie), "submit_avance=1&estatus=EN_PROCESO&nota="))
			.await
			.unwrap();
		let flash = set_cookies(&response)
			.into_iter()
			.find(|cookie| cookie.starts_with(crate::flash::FLASH_COOKIE))
			.unwrap();
		let flash = flash.split(';').next().unwrap();

		let response = app
			.oneshot(get(&uri, Some(&format!("{cookie}; {flash}"))))
			.await
			.unwrap();
		let body = json(response).await;
		assert_eq!(body["messages"][0]["text"], "Avance registrado.");
		assert_eq!(body["messages"][0]["level"], "success");
	}
}
