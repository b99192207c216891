//! Appointment scheduling pages

use axum::{
	extract::{Path, State},
	response::Response,
	routing::get,
	Form, Router,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use tracing::info;
use wraplab_core::{
	operations::appointments::{
		create_appointment, delete_appointment, get_appointment, update_appointment,
		AppointmentForm, AppointmentView,
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
		.route(
			"/dashboard/citas/nueva/",
			get(new_appointment_page).post(create_appointment_submit),
		)
		.route(
			"/dashboard/citas/:id/editar/",
			get(edit_appointment_page).post(edit_appointment_submit),
		)
		.route(
			"/dashboard/citas/:id/eliminar/",
			get(delete_appointment_page).post(delete_appointment_submit),
		)
}

#[derive(Serialize)]
struct AppointmentFormPage {
	title: &'static str,
	appointment: Option<AppointmentView>,
	form: AppointmentForm,
	errors: FormErrors,
	kinds: Vec<Choice>,
}

impl AppointmentFormPage {
	fn new(
		title: &'static str,
		appointment: Option<AppointmentView>,
		form: AppointmentForm,
		errors: FormErrors,
	) -> Self {
		Self {
			title,
			appointment,
			form,
			errors,
			kinds: views::appointment_kind_choices(),
		}
	}
}

async fn new_appointment_page(_staff: StaffUser, jar: CookieJar) -> Response {
	views::ok(
		jar,
		AppointmentFormPage::new(
			"Nueva cita",
			None,
			AppointmentForm::default(),
			FormErrors::default(),
		),
	)
}

async fn create_appointment_submit(
	StaffUser(staff): StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Form(form): Form<AppointmentForm>,
) -> AppResult<Response> {
	match create_appointment(state.conn(), &form).await {
		Ok(appointment) => {
			info!(staff = %staff.username, "Scheduled appointment {}", appointment.id);
			Ok(views::redirect_with(
				jar,
				views::DASHBOARD_PATH,
				FlashMessage::success("Cita agendada."),
			))
		}
		Err(CoreError::Validation(errors)) => Ok(views::invalid(
			jar,
			AppointmentFormPage::new("Nueva cita", None, form, errors),
		)),
		Err(err) => Err(err.into()),
	}
}

async fn edit_appointment_page(
	_staff: StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Path(appointment_id): Path<i32>,
) -> AppResult<Response> {
	let appointment = get_appointment(state.conn(), appointment_id).await?;
	Ok(views::ok(
		jar,
		AppointmentFormPage::new(
			"Editar cita",
			Some(AppointmentView::from(&appointment)),
			AppointmentForm::from_model(&appointment),
			FormErrors::default(),
		),
	))
}

async fn edit_appointment_submit(
	StaffUser(staff): StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Path(appointment_id): Path<i32>,
	Form(form): Form<AppointmentForm>,
) -> AppResult<Response> {
	match update_appointment(state.conn(), appointment_id, &form).await {
		Ok(_) => {
			info!(staff = %staff.username, "Updated appointment {}", appointment_id);
			Ok(views::redirect_with(
				jar,
				views::DASHBOARD_PATH,
				FlashMessage::success("Cita actualizada."),
			))
		}
		Err(CoreError::Validation(errors)) => {
			let appointment = get_appointment(state.conn(), appointment_id).await?;
			Ok(views::invalid(
				jar,
				AppointmentFormPage::new(
					"Editar cita",
					Some(AppointmentView::from(&appointment)),
					form,
					errors,
				),
			))
		}
		Err(err) => Err(err.into()),
	}
}

#[derive(Serialize)]
struct ConfirmDeletePage {
	appointment: AppointmentView,
}

async fn delete_appointment_page(
	_staff: StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Path(appointment_id): Path<i32>,
) -> AppResult<Response> {
	let appointment = get_appointment(state.conn(), appointment_id).await?;
	Ok(views::ok(
		jar,
		ConfirmDeletePage {
			appointment: AppointmentView::from(&appointment),
		},
	))
}

async fn delete_appointment_submit(
	StaffUser(staff): StaffUser,
	State(state): State<AppState>,
	jar: CookieJar,
	Path(appointment_id): Path<i32>,
) -> AppResult<Response> {
	delete_appointment(state.conn(), appointment_id).await?;
	info!(staff = %staff.username, "Deleted appointment {}", appointment_id);
	Ok(views::redirect_with(
		jar,
		views::DASHBOARD_PATH,
		FlashMessage::success("Cita eliminada."),
	))
}
