//! Service order entity

use crate::domain::order::{balance_due, cents_to_decimal};
use crate::domain::{OrderStatus, ServiceKind};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	/// Public identifier given to the customer; assigned on insert, never changed
	#[sea_orm(unique, indexed)]
	pub folio: String,

	pub client_name: String,
	pub vehicle_make: String,
	pub vehicle_model: String,
	pub vehicle_plate: String,
	pub vehicle_year: i32,
	pub vehicle_color: String,
	pub service: ServiceKind,

	/// Stage code, see [`OrderStatus`]
	#[sea_orm(indexed)]
	pub status: String,

	pub total_cost_cents: i64,
	pub amount_paid_cents: i64,

	/// Warning-light codes as a JSON array of strings
	#[sea_orm(column_type = "Json")]
	pub warning_lights: Json,

	#[sea_orm(column_type = "Text")]
	pub notes: String,

	pub created_at: DateTimeUtc,

	#[sea_orm(indexed)]
	pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::progress_entry::Entity")]
	ProgressEntries,
	#[sea_orm(has_many = "super::order_photo::Entity")]
	Photos,
}

impl Related<super::progress_entry::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::ProgressEntries.def()
	}
}

impl Related<super::order_photo::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Photos.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
	pub fn order_status(&self) -> Option<OrderStatus> {
		OrderStatus::from_code(&self.status)
	}

	pub fn is_completed(&self) -> bool {
		self.order_status().is_some_and(OrderStatus::is_terminal)
	}

	pub fn total_cost(&self) -> Decimal {
		cents_to_decimal(self.total_cost_cents)
	}

	pub fn amount_paid(&self) -> Decimal {
		cents_to_decimal(self.amount_paid_cents)
	}

	/// Computed on every read, never stored
	pub fn balance_due(&self) -> Decimal {
		balance_due(self.total_cost(), self.amount_paid())
	}

	/// Warning-light codes; malformed stored JSON yields an empty list
	pub fn warning_light_codes(&self) -> Vec<String> {
		serde_json::from_value(self.warning_lights.clone()).unwrap_or_default()
	}
}
