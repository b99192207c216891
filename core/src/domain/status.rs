//! Workflow stage of a service order.
//!
//! The variants below form the single canonical ordering used both by the
//! transition logic and by the customer-facing step tracker. Stages are
//! persisted by code (e.g. `EN_PROCESO`) rather than as a database enum so
//! that values written by older schema revisions still load; unknown codes
//! surface as `None` from [`OrderStatus::from_code`].

use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
pub enum OrderStatus {
	#[serde(rename = "EN_RECEPCION")]
	#[strum(serialize = "EN_RECEPCION")]
	Received,
	#[serde(rename = "EN_PREPARACION")]
	#[strum(serialize = "EN_PREPARACION")]
	Preparing,
	#[serde(rename = "EN_PROCESO")]
	#[strum(serialize = "EN_PROCESO")]
	InProcess,
	#[serde(rename = "PREPARANDO_ENTREGA")]
	#[strum(serialize = "PREPARANDO_ENTREGA")]
	PreparingDelivery,
	#[serde(rename = "TRABAJO_TERMINADO")]
	#[strum(serialize = "TRABAJO_TERMINADO")]
	Finished,
}

impl OrderStatus {
	/// Every stage, in workflow order
	pub const ALL: [OrderStatus; 5] = [
		OrderStatus::Received,
		OrderStatus::Preparing,
		OrderStatus::InProcess,
		OrderStatus::PreparingDelivery,
		OrderStatus::Finished,
	];

	/// Stage that marks an order as completed
	pub const TERMINAL: OrderStatus = OrderStatus::Finished;

	pub fn code(self) -> &'static str {
		match self {
			OrderStatus::Received => "EN_RECEPCION",
			OrderStatus::Preparing => "EN_PREPARACION",
			OrderStatus::InProcess => "EN_PROCESO",
			OrderStatus::PreparingDelivery => "PREPARANDO_ENTREGA",
			OrderStatus::Finished => "TRABAJO_TERMINADO",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			OrderStatus::Received => "En Recepción",
			OrderStatus::Preparing => "En Preparación",
			OrderStatus::InProcess => "En Proceso",
			OrderStatus::PreparingDelivery => "Preparando Entrega",
			OrderStatus::Finished => "Trabajo Terminado",
		}
	}

	/// Position within [`OrderStatus::ALL`]
	pub fn index(self) -> usize {
		match self {
			OrderStatus::Received => 0,
			OrderStatus::Preparing => 1,
			OrderStatus::InProcess => 2,
			OrderStatus::PreparingDelivery => 3,
			OrderStatus::Finished => 4,
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		code.parse().ok()
	}

	/// Step-tracker position for a stored code. Codes outside the canonical
	/// list (legacy revisions) map to the first step.
	pub fn step_index(code: &str) -> usize {
		Self::from_code(code).map_or(0, Self::index)
	}

	/// Label for a stored code, falling back to the raw code
	pub fn label_for(code: &str) -> &str {
		Self::from_code(code).map_or(code, |status| status.label())
	}

	pub fn is_terminal(self) -> bool {
		self == Self::TERMINAL
	}
}

impl Default for OrderStatus {
	fn default() -> Self {
		OrderStatus::Received
	}
}

impl std::fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.code())
	}
}
