//! Appointment scheduling, unrelated to orders

use crate::common::errors::{CoreError, FormErrors, Result, NON_FIELD_ERRORS};
use crate::common::forms;
use crate::domain::AppointmentKind;
use crate::infrastructure::database::entities::{appointment, Appointment};
use chrono::{DateTime, Utc};
use sea_orm::{
	ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
	QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Format of an HTML `datetime-local` value
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
	#[serde(rename = "cliente_nombre")]
	pub client_name: String,
	#[serde(rename = "cliente_contacto")]
	pub client_contact: String,
	#[serde(rename = "fecha")]
	pub scheduled_at: String,
	#[serde(rename = "tipo")]
	pub kind: String,
	#[serde(rename = "notas")]
	pub notes: String,
	/// Checkbox; absent when unticked
	#[serde(rename = "completada", skip_serializing_if = "Option::is_none")]
	pub completed: Option<String>,
}

struct AppointmentInput {
	client_name: String,
	client_contact: String,
	scheduled_at: DateTime<Utc>,
	kind: AppointmentKind,
	notes: String,
	completed: bool,
}

impl AppointmentForm {
	pub fn from_model(model: &appointment::Model) -> Self {
		Self {
			client_name: model.client_name.clone(),
			client_contact: model.client_contact.clone(),
			scheduled_at: model.scheduled_at.format(DATETIME_LOCAL_FORMAT).to_string(),
			kind: model.kind.code().to_string(),
			notes: model.notes.clone(),
			completed: model.completed.then(|| "on".to_string()),
		}
	}

	fn validate(&self) -> Result<AppointmentInput> {
		let mut errors = FormErrors::default();

		let client_name = forms::required_text(&mut errors, "cliente_nombre", &self.client_name, 200);
		let client_contact =
			forms::optional_text(&mut errors, "cliente_contacto", &self.client_contact, 100);
		let scheduled_at = forms::datetime_local(&mut errors, "fecha", &self.scheduled_at);
		let notes = forms::optional_text(&mut errors, "notas", &self.notes, usize::MAX);
		let kind = match self.kind.trim() {
			"" => Some(AppointmentKind::default()),
			code => AppointmentKind::from_code(code).or_else(|| {
				errors.add("tipo", forms::invalid_choice(code));
				None
			}),
		};

		errors.into_result()?;
		let (Some(client_name), Some(client_contact), Some(scheduled_at), Some(kind), Some(notes)) =
			(client_name, client_contact, scheduled_at, kind, notes)
		else {
			return Err(CoreError::invalid(NON_FIELD_ERRORS, "Formulario inválido."));
		};

		Ok(AppointmentInput {
			client_name,
			client_contact,
			scheduled_at,
			kind,
			notes,
			completed: forms::checkbox(self.completed.as_deref()),
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentView {
	pub id: i32,
	pub client_name: String,
	pub client_contact: String,
	pub scheduled_at: DateTime<Utc>,
	pub kind: String,
	pub kind_label: String,
	pub notes: String,
	pub completed: bool,
}

impl From<&appointment::Model> for AppointmentView {
	fn from(model: &appointment::Model) -> Self {
		Self {
			id: model.id,
			client_name: model.client_name.clone(),
			client_contact: model.client_contact.clone(),
			scheduled_at: model.scheduled_at,
			kind: model.kind.code().to_string(),
			kind_label: model.kind.label().to_string(),
			notes: model.notes.clone(),
			completed: model.completed,
		}
	}
}

pub async fn create_appointment(
	db: &DatabaseConnection,
	form: &AppointmentForm,
) -> Result<appointment::Model> {
	let input = form.validate()?;
	let model = appointment::ActiveModel {
		client_name: Set(input.client_name),
		client_contact: Set(input.client_contact),
		scheduled_at: Set(input.scheduled_at),
		kind: Set(input.kind),
		notes: Set(input.notes),
		completed: Set(input.completed),
		created_at: Set(Utc::now()),
		..Default::default()
	}
	.insert(db)
	.await?;

	info!(appointment_id = model.id, "Scheduled appointment for {}", model.scheduled_at);
	Ok(model)
}

pub async fn update_appointment(
	db: &DatabaseConnection,
	appointment_id: i32,
	form: &AppointmentForm,
) -> Result<appointment::Model> {
	let existing = get_appointment(db, appointment_id).await?;
	let input = form.validate()?;

	let mut active: appointment::ActiveModel = existing.into();
	active.client_name = Set(input.client_name);
	active.client_contact = Set(input.client_contact);
	active.scheduled_at = Set(input.scheduled_at);
	active.kind = Set(input.kind);
	active.notes = Set(input.notes);
	active.completed = Set(input.completed);
	let model = active.update(db).await?;

	info!(appointment_id, completed = model.completed, "Updated appointment");
	Ok(model)
}

pub async fn delete_appointment(db: &DatabaseConnection, appointment_id: i32) -> Result<()> {
	let existing = get_appointment(db, appointment_id).await?;
	existing.delete(db).await?;
	info!(appointment_id, "Deleted appointment");
	Ok(())
}

pub async fn get_appointment(
	db: &DatabaseConnection,
	appointment_id: i32,
) -> Result<appointment::Model> {
	Appointment::find_by_id(appointment_id)
		.one(db)
		.await?
		.ok_or_else(|| CoreError::not_found("Appointment", appointment_id))
}

/// Pending appointments from `now` on, soonest first
pub async fn list_upcoming(
	db: &DatabaseConnection,
	now: DateTime<Utc>,
) -> Result<Vec<appointment::Model>> {
	Ok(Appointment::find()
		.filter(appointment::Column::ScheduledAt.gte(now))
		.filter(appointment::Column::Completed.eq(false))
		.order_by_asc(appointment::Column::ScheduledAt)
		.order_by_asc(appointment::Column::Id)
		.all(db)
		.await?)
}
