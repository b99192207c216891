//! Cost ledger: total cost and amount paid, edited independently.
//!
//! No relation is enforced between the two; an overpaid order simply shows a
//! negative balance.

use crate::common::errors::{CoreError, FormErrors, Result, NON_FIELD_ERRORS};
use crate::common::forms;
use crate::domain::order::decimal_to_cents;
use crate::infrastructure::database::entities::order;
use crate::operations::orders::get_order;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostsForm {
	#[serde(rename = "costo_total")]
	pub total_cost: String,
	#[serde(rename = "monto_pagado")]
	pub amount_paid: String,
}

impl CostsForm {
	pub fn from_model(model: &order::Model) -> Self {
		Self {
			total_cost: model.total_cost().to_string(),
			amount_paid: model.amount_paid().to_string(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostSummary {
	pub total_cost: Decimal,
	pub amount_paid: Decimal,
	pub balance_due: Decimal,
}

impl From<&order::Model> for CostSummary {
	fn from(model: &order::Model) -> Self {
		Self {
			total_cost: model.total_cost(),
			amount_paid: model.amount_paid(),
			balance_due: model.balance_due(),
		}
	}
}

pub async fn update_costs(
	db: &DatabaseConnection,
	order_id: i32,
	form: &CostsForm,
) -> Result<order::Model> {
	let existing = get_order(db, order_id).await?;

	let mut errors = FormErrors::default();
	let total_cost = forms::money(&mut errors, "costo_total", &form.total_cost);
	let amount_paid = forms::money(&mut errors, "monto_pagado", &form.amount_paid);
	errors.into_result()?;
	let (Some(total_cost), Some(amount_paid)) = (total_cost, amount_paid) else {
		return Err(CoreError::invalid(NON_FIELD_ERRORS, "Formulario inválido."));
	};

	let mut active: order::ActiveModel = existing.into();
	active.total_cost_cents = Set(decimal_to_cents(total_cost));
	active.amount_paid_cents = Set(decimal_to_cents(amount_paid));
	active.updated_at = Set(Utc::now());
	let model = active.update(db).await?;

	info!(
		order_id,
		total = %model.total_cost(),
		paid = %model.amount_paid(),
		"Updated costs of order {}",
		model.folio
	);
	Ok(model)
}
