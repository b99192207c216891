//! Order intake and editing

use super::folio::{generate_folio, insert_with_unique_folio};
use crate::common::errors::{CoreError, FormErrors, Result, NON_FIELD_ERRORS};
use crate::common::forms;
use crate::domain::order::{is_warning_light, warning_light_info, WarningLightInfo};
use crate::domain::{OrderStatus, ServiceKind};
use crate::infrastructure::database::entities::{order, order_photo, progress_entry, Order};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
	ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
	TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Order form as submitted, keyed by the form's field names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
	#[serde(rename = "cliente_nombre")]
	pub client_name: String,
	#[serde(rename = "vehiculo_marca")]
	pub vehicle_make: String,
	#[serde(rename = "vehiculo_modelo")]
	pub vehicle_model: String,
	#[serde(rename = "vehiculo_matricula")]
	pub vehicle_plate: String,
	#[serde(rename = "vehiculo_anio")]
	pub vehicle_year: String,
	#[serde(rename = "vehiculo_color")]
	pub vehicle_color: String,
	#[serde(rename = "servicio")]
	pub service: String,
	/// Initial stage; only honoured when creating an order
	#[serde(rename = "estatus")]
	pub status: String,
	#[serde(rename = "testigos")]
	pub warning_lights: Vec<String>,
	#[serde(rename = "notas")]
	pub notes: String,
}

/// Validated order fields
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInput {
	pub client_name: String,
	pub vehicle_make: String,
	pub vehicle_model: String,
	pub vehicle_plate: String,
	pub vehicle_year: i32,
	pub vehicle_color: String,
	pub service: ServiceKind,
	pub status: OrderStatus,
	pub warning_lights: Vec<String>,
	pub notes: String,
}

impl OrderForm {
	/// Prefill for the edit form
	pub fn from_model(model: &order::Model) -> Self {
		Self {
			client_name: model.client_name.clone(),
			vehicle_make: model.vehicle_make.clone(),
			vehicle_model: model.vehicle_model.clone(),
			vehicle_plate: model.vehicle_plate.clone(),
			vehicle_year: model.vehicle_year.to_string(),
			vehicle_color: model.vehicle_color.clone(),
			service: model.service.code().to_string(),
			status: model.status.clone(),
			warning_lights: model.warning_light_codes(),
			notes: model.notes.clone(),
		}
	}

	pub fn validate(&self) -> Result<OrderInput> {
		let mut errors = FormErrors::default();

		let client_name = forms::required_text(&mut errors, "cliente_nombre", &self.client_name, 200);
		let vehicle_make = forms::required_text(&mut errors, "vehiculo_marca", &self.vehicle_make, 80);
		let vehicle_model =
			forms::required_text(&mut errors, "vehiculo_modelo", &self.vehicle_model, 80);
		let vehicle_plate =
			forms::optional_text(&mut errors, "vehiculo_matricula", &self.vehicle_plate, 20);
		let vehicle_year = forms::positive_int(&mut errors, "vehiculo_anio", &self.vehicle_year);
		let vehicle_color =
			forms::required_text(&mut errors, "vehiculo_color", &self.vehicle_color, 80);
		let notes = forms::optional_text(&mut errors, "notas", &self.notes, usize::MAX);

		let service = match self.service.trim() {
			"" => Some(ServiceKind::default()),
			code => ServiceKind::from_code(code).or_else(|| {
				errors.add("servicio", forms::invalid_choice(code));
				None
			}),
		};

		let status = match self.status.trim() {
			"" => Some(OrderStatus::default()),
			code => OrderStatus::from_code(code).or_else(|| {
				errors.add("estatus", forms::invalid_choice(code));
				None
			}),
		};

		let mut warning_lights = Vec::new();
		for code in self.warning_lights.iter().map(|code| code.trim()) {
			if !is_warning_light(code) {
				errors.add("testigos", forms::invalid_choice(code));
			} else if !warning_lights.iter().any(|known| known == code) {
				warning_lights.push(code.to_string());
			}
		}

		errors.into_result()?;

		// Every parser recorded an error when it returned `None`
		let (
			Some(client_name),
			Some(vehicle_make),
			Some(vehicle_model),
			Some(vehicle_plate),
			Some(vehicle_year),
			Some(vehicle_color),
			Some(service),
			Some(status),
			Some(notes),
		) = (
			client_name,
			vehicle_make,
			vehicle_model,
			vehicle_plate,
			vehicle_year,
			vehicle_color,
			service,
			status,
			notes,
		)
		else {
			return Err(CoreError::invalid(NON_FIELD_ERRORS, "Formulario inválido."));
		};

		Ok(OrderInput {
			client_name,
			vehicle_make,
			vehicle_model,
			vehicle_plate,
			vehicle_year,
			vehicle_color,
			service,
			status,
			warning_lights,
			notes,
		})
	}
}

/// Read model of an order shared by the staff pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
	pub id: i32,
	pub folio: String,
	pub client_name: String,
	pub vehicle_make: String,
	pub vehicle_model: String,
	pub vehicle_plate: String,
	pub vehicle_year: i32,
	pub vehicle_color: String,
	pub service: String,
	pub service_label: String,
	pub status: String,
	pub status_label: String,
	pub completed: bool,
	pub total_cost: Decimal,
	pub amount_paid: Decimal,
	pub balance_due: Decimal,
	pub warning_lights: Vec<WarningLightInfo>,
	pub notes: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&order::Model> for OrderView {
	fn from(model: &order::Model) -> Self {
		Self {
			id: model.id,
			folio: model.folio.clone(),
			client_name: model.client_name.clone(),
			vehicle_make: model.vehicle_make.clone(),
			vehicle_model: model.vehicle_model.clone(),
			vehicle_plate: model.vehicle_plate.clone(),
			vehicle_year: model.vehicle_year,
			vehicle_color: model.vehicle_color.clone(),
			service: model.service.code().to_string(),
			service_label: model.service.label().to_string(),
			status: model.status.clone(),
			status_label: OrderStatus::label_for(&model.status).to_string(),
			completed: model.is_completed(),
			total_cost: model.total_cost(),
			amount_paid: model.amount_paid(),
			balance_due: model.balance_due(),
			warning_lights: warning_light_info(&model.warning_light_codes()),
			notes: model.notes.clone(),
			created_at: model.created_at,
			updated_at: model.updated_at,
		}
	}
}

/// Create an order from a submitted form and assign its folio
pub async fn create_order(db: &DatabaseConnection, form: &OrderForm) -> Result<order::Model> {
	let input = form.validate()?;
	let now = Utc::now();

	let active = order::ActiveModel {
		client_name: Set(input.client_name),
		vehicle_make: Set(input.vehicle_make),
		vehicle_model: Set(input.vehicle_model),
		vehicle_plate: Set(input.vehicle_plate),
		vehicle_year: Set(input.vehicle_year),
		vehicle_color: Set(input.vehicle_color),
		service: Set(input.service),
		status: Set(input.status.code().to_string()),
		total_cost_cents: Set(0),
		amount_paid_cents: Set(0),
		warning_lights: Set(serde_json::json!(input.warning_lights)),
		notes: Set(input.notes),
		created_at: Set(now),
		updated_at: Set(now),
		..Default::default()
	};

	let model = insert_with_unique_folio(db, active, generate_folio).await?;
	info!(order_id = model.id, "Created order {}", model.folio);
	Ok(model)
}

/// Update the intake fields of an order. Status is left alone: it only
/// changes through progress entries.
pub async fn update_order(
	db: &DatabaseConnection,
	order_id: i32,
	form: &OrderForm,
) -> Result<order::Model> {
	let existing = get_order(db, order_id).await?;
	let input = form.validate()?;

	let mut active: order::ActiveModel = existing.into();
	active.client_name = Set(input.client_name);
	active.vehicle_make = Set(input.vehicle_make);
	active.vehicle_model = Set(input.vehicle_model);
	active.vehicle_plate = Set(input.vehicle_plate);
	active.vehicle_year = Set(input.vehicle_year);
	active.vehicle_color = Set(input.vehicle_color);
	active.service = Set(input.service);
	active.warning_lights = Set(serde_json::json!(input.warning_lights));
	active.notes = Set(input.notes);
	active.updated_at = Set(Utc::now());

	let model = active.update(db).await?;
	info!(order_id = model.id, "Updated order {}", model.folio);
	Ok(model)
}

pub async fn get_order(db: &DatabaseConnection, order_id: i32) -> Result<order::Model> {
	Order::find_by_id(order_id)
		.one(db)
		.await?
		.ok_or_else(|| CoreError::not_found("Order", order_id))
}

/// Exact folio match; callers normalise case first
pub async fn find_by_folio(db: &DatabaseConnection, folio: &str) -> Result<Option<order::Model>> {
	Ok(Order::find()
		.filter(order::Column::Folio.eq(folio))
		.one(db)
		.await?)
}

/// Delete an order together with its progress entries and photos
pub async fn delete_order(db: &DatabaseConnection, order_id: i32) -> Result<()> {
	let existing = get_order(db, order_id).await?;
	let txn = db.begin().await?;

	progress_entry::Entity::delete_many()
		.filter(progress_entry::Column::OrderId.eq(order_id))
		.exec(&txn)
		.await?;
	order_photo::Entity::delete_many()
		.filter(order_photo::Column::OrderId.eq(order_id))
		.exec(&txn)
		.await?;
	Order::delete_by_id(order_id).exec(&txn).await?;

	txn.commit().await?;
	info!(order_id, "Deleted order {}", existing.folio);
	Ok(())
}
