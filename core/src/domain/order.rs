//! Service kinds, warning lights and money helpers for orders

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of work ordered
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(12))")]
pub enum ServiceKind {
	#[default]
	#[sea_orm(string_value = "WRAP")]
	#[serde(rename = "WRAP")]
	Wrap,
	#[sea_orm(string_value = "PPF")]
	#[serde(rename = "PPF")]
	Ppf,
	#[sea_orm(string_value = "WRAP_PPF")]
	#[serde(rename = "WRAP_PPF")]
	WrapPpf,
}

impl ServiceKind {
	pub const ALL: [ServiceKind; 3] = [ServiceKind::Wrap, ServiceKind::Ppf, ServiceKind::WrapPpf];

	pub fn code(self) -> &'static str {
		match self {
			ServiceKind::Wrap => "WRAP",
			ServiceKind::Ppf => "PPF",
			ServiceKind::WrapPpf => "WRAP_PPF",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			ServiceKind::Wrap => "Wrap",
			ServiceKind::Ppf => "PPF",
			ServiceKind::WrapPpf => "Wrap + PPF",
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.code() == code)
	}
}

/// Dashboard warning lights ("testigos") that can be recorded at intake
pub const WARNING_LIGHTS: [(&str, &str); 12] = [
	("check_engine", "Check Engine"),
	("abs", "ABS"),
	("airbag", "Bolsa de Aire"),
	("battery", "Batería"),
	("oil", "Aceite"),
	("brake", "Frenos"),
	("temp", "Temperatura"),
	("tire", "Presión de Llantas"),
	("stability", "Control de Estabilidad"),
	("bulb", "Foco Fundido"),
	("gas", "Reserva de Gasolina"),
	("service", "Servicio Programado"),
];

pub fn is_warning_light(code: &str) -> bool {
	WARNING_LIGHTS.iter().any(|(known, _)| *known == code)
}

/// Label for a warning-light code; codes no longer in the list render as-is
pub fn warning_light_label(code: &str) -> &str {
	WARNING_LIGHTS
		.iter()
		.find(|(known, _)| *known == code)
		.map_or(code, |(_, label)| label)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningLightInfo {
	pub code: String,
	pub label: String,
}

pub fn warning_light_info(codes: &[String]) -> Vec<WarningLightInfo> {
	codes
		.iter()
		.map(|code| WarningLightInfo {
			code: code.clone(),
			label: warning_light_label(code).to_string(),
		})
		.collect()
}

/// Money is persisted as whole cents
pub fn cents_to_decimal(cents: i64) -> Decimal {
	Decimal::new(cents, 2)
}

/// Convert an amount with at most two decimal places to cents
pub fn decimal_to_cents(amount: Decimal) -> i64 {
	let mut scaled = amount * Decimal::ONE_HUNDRED;
	scaled.rescale(0);
	scaled.mantissa() as i64
}

/// Outstanding balance. Overpayment yields a negative value and is kept as such.
pub fn balance_due(total_cost: Decimal, amount_paid: Decimal) -> Decimal {
	total_cost - amount_paid
}
