//! Appointment entity, independent of orders

use crate::domain::AppointmentKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	pub client_name: String,

	/// Phone number or email
	pub client_contact: String,

	#[sea_orm(indexed)]
	pub scheduled_at: DateTimeUtc,

	pub kind: AppointmentKind,

	#[sea_orm(column_type = "Text")]
	pub notes: String,

	pub completed: bool,

	pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
