//! Staff dashboard and order management

use std::collections::HashMap;

use axum::{
	extract::{Path, Query, State},
	response::Response,
	routing::get,
	Form, Router,
};
use axum_extra::extract::{CookieJar, Form as MultiForm};
use chrono::Utc;
use http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::info;
use wraplab_core::{
	infrastructure::database::entities::order,
	operations::{
		costs::{update_costs, CostSummary, CostsForm},
		dashboard,
		gallery::{
			gallery_slots, list_photos, repair_gallery, save_gallery, GallerySlot,
			GallerySubmission, PhotoView,
		},
		orders::{create_order, get_order, update_order, OrderForm, OrderView},
		progress::{list_progress, record_progress, ProgressForm, ProgressView},
	},
	CoreError, FormErrors,
};

use crate::{
	error::AppResult,
	flash::FlashMessage,
	session::StaffUser,
	state::AppState,
	views::{self, Choice},
};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/dashboard/", get(dashboard_page))
		.route("/dashboard/nuevo/", get(new_order_page).post(create_order_submit))
		.route("/dashboard/:id/", get(order_detail).post(order_detail_submit))
		.route("/dashboard/:id/editar/", get(edit_order_page).post(edit_order_submit))
}

#[derive(Deserialize)]
struct DashboardQuery {
	q: Option<String>,
}

async fn dashboard_page(
	_staff: StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Query(query): Query<DashboardQuery>,
) -> AppResult<Response> {
	let view = dashboard::dashboard(
		state.conn(),
		query.q.as_deref().unwrap_or_default(),
		Utc::now(),
	)
	.await?;
	Ok(views::ok(jar, view))
}

#[derive(Serialize)]
struct OrderFormPage {
	title: &'static str,
	order: Option<OrderView>,
	form: OrderForm,
	errors: FormErrors,
	services: Vec<Choice>,
	statuses: Vec<Choice>,
	warning_lights: Vec<Choice>,
}

impl OrderFormPage {
	fn new(title: &'static str, order: Option<&order::Model>, form: OrderForm) -> Self {
		Self {
			title,
			order: order.map(OrderView::from),
			form,
			errors: FormErrors::default(),
			services: views::service_choices(),
			statuses: views::status_choices(),
			warning_lights: views::warning_light_choices(),
		}
	}

	fn with_errors(mut self, errors: FormErrors) -> Self {
		self.errors = errors;
		self
	}
}

async fn new_order_page(_staff: StaffUser, jar: CookieJar) -> Response {
	views::ok(jar, OrderFormPage::new("Nueva orden", None, OrderForm::default()))
}

async fn create_order_submit(
	StaffUser(staff): StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	MultiForm(form): MultiForm<OrderForm>,
) -> AppResult<Response> {
	match create_order(state.conn(), &form).await {
		Ok(order) => {
			info!(staff = %staff.username, "Created order {}", order.folio);
			Ok(views::redirect_with(
				jar,
				&views::order_path(order.id),
				FlashMessage::success(format!("Orden creada. Folio: {}", order.folio)),
			))
		}
		Err(CoreError::Validation(errors)) => Ok(views::invalid(
			jar,
			OrderFormPage::new("Nueva orden", None, form).with_errors(errors),
		)),
		Err(err) => Err(err.into()),
	}
}

async fn edit_order_page(
	_staff: StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Path(order_id): Path<i32>,
) -> AppResult<Response> {
	let order = get_order(state.conn(), order_id).await?;
	let form = OrderForm::from_model(&order);
	Ok(views::ok(jar, OrderFormPage::new("Editar orden", Some(&order), form)))
}

async fn edit_order_submit(
	StaffUser(staff): StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Path(order_id): Path<i32>,
	MultiForm(form): MultiForm<OrderForm>,
) -> AppResult<Response> {
	match update_order(state.conn(), order_id, &form).await {
		Ok(order) => {
			info!(staff = %staff.username, "Updated order {}", order.folio);
			Ok(views::redirect_with(
				jar,
				views::DASHBOARD_PATH,
				FlashMessage::success(format!("Orden {} actualizada.", order.folio)),
			))
		}
		Err(CoreError::Validation(errors)) => {
			let order = get_order(state.conn(), order_id).await?;
			Ok(views::invalid(
				jar,
				OrderFormPage::new("Editar orden", Some(&order), form).with_errors(errors),
			))
		}
		Err(err) => Err(err.into()),
	}
}

/// Which of the detail page's three forms a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum DetailForm {
	Progress,
	Costs,
	Gallery,
}

impl DetailForm {
	fn from_fields(fields: &HashMap<String, String>) -> Option<Self> {
		if fields.contains_key("submit_avance") {
			Some(Self::Progress)
		} else if fields.contains_key("submit_costos") {
			Some(Self::Costs)
		} else if fields.contains_key("submit_fotos") {
			Some(Self::Gallery)
		} else {
			None
		}
	}
}

#[derive(Serialize)]
struct OrderDetailPage {
	order: OrderView,
	costs: CostSummary,
	customer_url: String,
	progress: Vec<ProgressView>,
	photos: Vec<PhotoView>,
	progress_form: ProgressForm,
	costs_form: CostsForm,
	gallery: Vec<GallerySlot>,
	statuses: Vec<Choice>,
	/// Form the errors below belong to, if any
	failed_form: Option<DetailForm>,
	errors: FormErrors,
}

async fn detail_page(
	state: &AppState,
	headers: &HeaderMap,
	order: &order::Model,
) -> AppResult<OrderDetailPage> {
	let progress = list_progress(state.conn(), order.id).await?;
	let photos = list_photos(state.conn(), order.id).await?;
	let gallery = gallery_slots(state.conn(), order.id).await?;
	let host = headers.get(header::HOST).and_then(|value| value.to_str().ok());

	Ok(OrderDetailPage {
		order: OrderView::from(order),
		costs: CostSummary::from(order),
		customer_url: state.tracking_url(host, &order.folio),
		progress: progress.iter().map(ProgressView::from).collect(),
		photos: photos.iter().map(PhotoView::from).collect(),
		progress_form: ProgressForm::for_order(order),
		costs_form: CostsForm::from_model(order),
		gallery,
		statuses: views::status_choices(),
		failed_form: None,
		errors: FormErrors::default(),
	})
}

async fn order_detail(
	_staff: StaffUser,
	State(state): State<AppState>,
	headers: HeaderMap,
	jar: CookieJar,
	Path(order_id): Path<i32>,
) -> AppResult<Response> {
	let mut order = get_order(state.conn(), order_id).await?;
	if repair_gallery(state.conn(), order.id).await? > 0 {
		order = get_order(state.conn(), order_id).await?;
	}
	let page = detail_page(&state, &headers, &order).await?;
	Ok(views::ok(jar, page))
}

async fn order_detail_submit(
	StaffUser(staff): StaffUser,
	State(state): State<AppState>,
	headers: HeaderMap,
	jar: CookieJar,
	Path(order_id): Path<i32>,
	Form(fields): Form<HashMap<String, String>>,
) -> AppResult<Response> {
	let order = get_order(state.conn(), order_id).await?;
	let field = |name: &str| fields.get(name).cloned().unwrap_or_default();
	let here = views::order_path(order.id);

	let Some(kind) = DetailForm::from_fields(&fields) else {
		let page = detail_page(&state, &headers, &order).await?;
		return Ok(views::ok(jar, page));
	};

	let outcome = match kind {
		DetailForm::Progress => {
			let form = ProgressForm {
				status: field("estatus"),
				note: field("nota"),
			};
			record_progress(state.conn(), order.id, &form)
				.await
				.map(|_| "Avance registrado.")
				.map_err(|err| (err, Resubmitted::Progress(form)))
		}
		DetailForm::Costs => {
			let form = CostsForm {
				total_cost: field("costo_total"),
				amount_paid: field("monto_pagado"),
			};
			update_costs(state.conn(), order.id, &form)
				.await
				.map(|_| "Costos actualizados.")
				.map_err(|err| (err, Resubmitted::Costs(form)))
		}
		DetailForm::Gallery => {
			let submission = GallerySubmission::from_fields(&fields);
			save_gallery(state.conn(), order.id, &submission)
				.await
				.map(|_| "Galería actualizada correctamente.")
				.map_err(|err| (err, Resubmitted::Gallery(submission)))
		}
	};

	match outcome {
		Ok(message) => {
			info!(staff = %staff.username, form = ?kind, "Saved order {}", order.folio);
			Ok(views::redirect_with(jar, &here, FlashMessage::success(message)))
		}
		Err((CoreError::Validation(errors), resubmitted)) => {
			let mut page = detail_page(&state, &headers, &order).await?;
			resubmitted.apply(&mut page);
			page.failed_form = Some(kind);
			page.errors = errors;
			Ok(views::invalid(jar, page))
		}
		Err((err, _)) => Err(err.into()),
	}
}

/// Submitted values to show again next to their errors
enum Resubmitted {
	Progress(ProgressForm),
	Costs(CostsForm),
	Gallery(GallerySubmission),
}

impl Resubmitted {
	fn apply(self, page: &mut OrderDetailPage) {
		match self {
			Resubmitted::Progress(form) => page.progress_form = form,
			Resubmitted::Costs(form) => page.costs_form = form,
			Resubmitted::Gallery(submission) => {
				for (slot, submitted) in page.gallery.iter_mut().zip(submission.0) {
					slot.url = submitted.filter(|url| !url.trim().is_empty());
				}
			}
		}
	}
}
