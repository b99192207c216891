//! Appointment kinds

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AppointmentKind {
	/// Existing client booking new work
	#[sea_orm(string_value = "SERVICIO")]
	#[serde(rename = "SERVICIO")]
	Service,
	/// Prospective client
	#[default]
	#[sea_orm(string_value = "PROSPECTO")]
	#[serde(rename = "PROSPECTO")]
	Prospect,
}

impl AppointmentKind {
	pub const ALL: [AppointmentKind; 2] = [AppointmentKind::Service, AppointmentKind::Prospect];

	pub fn code(self) -> &'static str {
		match self {
			AppointmentKind::Service => "SERVICIO",
			AppointmentKind::Prospect => "PROSPECTO",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			AppointmentKind::Service => "Nuevo servicio",
			AppointmentKind::Prospect => "Prospecto",
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.code() == code)
	}
}
