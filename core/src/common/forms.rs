//! Field parsers shared by the form-backed operations.
//!
//! Each parser records its message into a [`FormErrors`] under the submitted
//! field name and returns `None` on failure, so a form can collect every error
//! in one pass before deciding whether to write anything.

use super::errors::FormErrors;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

pub const REQUIRED: &str = "Este campo es obligatorio.";
pub const INVALID_URL: &str = "Introduzca una URL válida.";

/// Largest accepted money value is 10 digits with 2 decimal places
const MAX_MONEY_DIGITS: u32 = 10;
const MONEY_DECIMAL_PLACES: u32 = 2;

/// Trimmed text that must be present and at most `max_len` characters
pub fn required_text(
	errors: &mut FormErrors,
	field: &str,
	value: &str,
	max_len: usize,
) -> Option<String> {
	let value = value.trim();
	if value.is_empty() {
		errors.add(field, REQUIRED);
		return None;
	}
	bounded_text(errors, field, value, max_len)
}

/// Trimmed text that may be blank
pub fn optional_text(
	errors: &mut FormErrors,
	field: &str,
	value: &str,
	max_len: usize,
) -> Option<String> {
	bounded_text(errors, field, value.trim(), max_len)
}

fn bounded_text(
	errors: &mut FormErrors,
	field: &str,
	value: &str,
	max_len: usize,
) -> Option<String> {
	let len = value.chars().count();
	if len > max_len {
		errors.add(
			field,
			format!(
				"Asegúrese de que este valor tenga a lo más {max_len} caracteres (tiene {len})."
			),
		);
		return None;
	}
	Some(value.to_string())
}

pub fn positive_int(errors: &mut FormErrors, field: &str, value: &str) -> Option<i32> {
	let value = value.trim();
	if value.is_empty() {
		errors.add(field, REQUIRED);
		return None;
	}
	match value.parse::<i32>() {
		Ok(n) if n >= 0 => Some(n),
		Ok(_) => {
			errors.add(field, "Asegúrese de que este valor es mayor o igual a 0.");
			None
		}
		Err(_) => {
			errors.add(field, "Introduzca un número entero.");
			None
		}
	}
}

/// Decimal with at most 10 digits, 2 of them after the point. Negative values are accepted.
pub fn money(errors: &mut FormErrors, field: &str, value: &str) -> Option<Decimal> {
	let value = value.trim();
	if value.is_empty() {
		errors.add(field, REQUIRED);
		return None;
	}
	let Ok(amount) = Decimal::from_str(value) else {
		errors.add(field, "Introduzca un número.");
		return None;
	};
	let amount = amount.normalize();
	if amount.scale() > MONEY_DECIMAL_PLACES {
		errors.add(
			field,
			format!("Asegúrese de que no hay más de {MONEY_DECIMAL_PLACES} decimales."),
		);
		return None;
	}
	let whole_digits = amount.trunc().abs().to_string().trim_start_matches('0').len() as u32;
	if whole_digits > MAX_MONEY_DIGITS - MONEY_DECIMAL_PLACES {
		errors.add(
			field,
			format!(
				"Asegúrese de que no hay más de {} dígitos antes del punto decimal.",
				MAX_MONEY_DIGITS - MONEY_DECIMAL_PLACES
			),
		);
		return None;
	}
	Some(amount)
}

/// Absolute http(s) URL
pub fn http_url(errors: &mut FormErrors, field: &str, value: &str) -> Option<String> {
	let value = value.trim();
	match Url::parse(value) {
		Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
			Some(value.to_string())
		}
		_ => {
			errors.add(field, INVALID_URL);
			None
		}
	}
}

/// `datetime-local` input (`YYYY-MM-DDTHH:MM`, seconds optional), read as UTC
pub fn datetime_local(
	errors: &mut FormErrors,
	field: &str,
	value: &str,
) -> Option<DateTime<Utc>> {
	let value = value.trim();
	if value.is_empty() {
		errors.add(field, REQUIRED);
		return None;
	}
	const FORMATS: [&str; 4] = [
		"%Y-%m-%dT%H:%M",
		"%Y-%m-%dT%H:%M:%S",
		"%Y-%m-%d %H:%M",
		"%Y-%m-%d %H:%M:%S",
	];
	FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
		.map(|naive| naive.and_utc())
		.or_else(|| {
			errors.add(field, "Introduzca una fecha/hora válida.");
			None
		})
}

/// Message for a value outside a fixed set of choices
pub fn invalid_choice(value: &str) -> String {
	format!("Escoja una opción válida. {value} no es una de las opciones disponibles.")
}

/// HTML checkbox: absent when unticked, usually `on` when ticked
pub fn checkbox(value: Option<&str>) -> bool {
	match value.map(str::trim) {
		None | Some("") => false,
		Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "false" | "0" | "off"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn required_text_trims_and_bounds() {
		let mut errors = FormErrors::default();
		assert_eq!(
			required_text(&mut errors, "name", "  Ana  ", 10).as_deref(),
			Some("Ana")
		);
		assert!(required_text(&mut errors, "blank", "   ", 10).is_none());
		assert!(required_text(&mut errors, "long", "abcdefghijk", 10).is_none());
		assert!(errors.contains("blank"));
		assert!(errors.contains("long"));
		assert!(!errors.contains("name"));
	}

	#[test]
	fn money_limits_scale_and_digits() {
		let mut errors = FormErrors::default();
		assert_eq!(
			money(&mut errors, "a", "1500.50"),
			Some(Decimal::from_str("1500.5").unwrap())
		);
		assert_eq!(
			money(&mut errors, "b", "-20"),
			Some(Decimal::from(-20))
		);
		assert_eq!(
			money(&mut errors, "c", "99999999.99"),
			Some(Decimal::from_str("99999999.99").unwrap())
		);
		assert!(money(&mut errors, "d", "1.005").is_none());
		assert!(money(&mut errors, "e", "123456789").is_none());
		assert!(money(&mut errors, "f", "abc").is_none());
		assert!(errors.contains("d"));
		assert!(errors.contains("e"));
		assert!(errors.contains("f"));
		assert!(!errors.contains("c"));
	}

	#[test]
	fn http_url_rejects_other_schemes() {
		let mut errors = FormErrors::default();
		assert!(http_url(&mut errors, "ok", "https://cdn.example.com/a.jpg").is_some());
		assert!(http_url(&mut errors, "ftp", "ftp://example.com/a.jpg").is_none());
		assert!(http_url(&mut errors, "junk", "not a url").is_none());
		assert_eq!(errors.get("ftp"), Some(&[INVALID_URL.to_string()][..]));
	}

	#[test]
	fn datetime_local_accepts_browser_format() {
		let mut errors = FormErrors::default();
		let parsed = datetime_local(&mut errors, "fecha", "2026-03-01T09:30").unwrap();
		assert_eq!(parsed.to_rfc3339(), "2026-03-01T09:30:00+00:00");
		assert!(datetime_local(&mut errors, "bad", "01/03/2026").is_none());
		assert!(errors.contains("bad"));
	}

	#[test]
	fn checkbox_values() {
		assert!(checkbox(Some("on")));
		assert!(checkbox(Some("true")));
		assert!(!checkbox(Some("false")));
		assert!(!checkbox(Some("")));
		assert!(!checkbox(None));
	}
}
