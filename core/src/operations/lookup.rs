//! Customer-facing order tracking by folio

use super::gallery::{list_photos, PhotoView};
use super::orders::find_by_folio;
use super::progress::{list_progress, ProgressView};
use crate::common::errors::{CoreError, Result};
use crate::domain::order::{warning_light_info, WarningLightInfo};
use crate::domain::OrderStatus;
use crate::infrastructure::database::entities::order;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::debug;

/// Folios are matched exactly after trimming and uppercasing
pub fn normalize_folio(input: &str) -> String {
	input.trim().to_uppercase()
}

/// What a customer may see of their order. Costs and internal notes stay out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicOrder {
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
	pub warning_lights: Vec<WarningLightInfo>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&order::Model> for PublicOrder {
	fn from(model: &order::Model) -> Self {
		Self {
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
			warning_lights: warning_light_info(&model.warning_light_codes()),
			created_at: model.created_at,
			updated_at: model.updated_at,
		}
	}
}

/// One stage of the visual step tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
	pub code: &'static str,
	pub label: &'static str,
}

pub fn steps() -> Vec<Step> {
	OrderStatus::ALL
		.iter()
		.map(|status| Step {
			code: status.code(),
			label: status.label(),
		})
		.collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingView {
	pub order: PublicOrder,
	pub progress: Vec<ProgressView>,
	pub photos: Vec<PhotoView>,
	pub steps: Vec<Step>,
	/// Index into `steps` of the order's stage; 0 for unknown codes
	pub current_step: usize,
}

/// Find an order by folio for the public tracking page
pub async fn lookup(db: &DatabaseConnection, folio: &str) -> Result<TrackingView> {
	let folio = normalize_folio(folio);
	let Some(order) = find_by_folio(db, &folio).await? else {
		debug!("No order with folio {}", folio);
		return Err(CoreError::not_found("Order", folio));
	};

	let progress = list_progress(db, order.id).await?;
	let photos = list_photos(db, order.id).await?;

	Ok(TrackingView {
		current_step: OrderStatus::step_index(&order.status),
		order: PublicOrder::from(&order),
		progress: progress.iter().map(ProgressView::from).collect(),
		photos: photos.iter().map(PhotoView::from).collect(),
		steps: steps(),
	})
}
