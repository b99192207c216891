//! Status progression.
//!
//! Appending a progress entry is the only way an order changes stage. Moving
//! to any stage is allowed, except the one the order is already in.

use crate::common::errors::{CoreError, FormErrors, Result};
use crate::common::forms;
use crate::domain::OrderStatus;
use crate::infrastructure::database::entities::{order, progress_entry, Order, ProgressEntry};
use chrono::{DateTime, Utc};
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
	QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SAME_STATUS: &str = "La orden ya se encuentra en ese estatus.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressForm {
	#[serde(rename = "estatus")]
	pub status: String,
	#[serde(rename = "nota")]
	pub note: String,
}

impl ProgressForm {
	/// Form prefilled with the order's current stage
	pub fn for_order(order: &order::Model) -> Self {
		Self {
			status: order.status.clone(),
			note: String::new(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
	pub id: i32,
	pub status: String,
	pub status_label: String,
	pub note: String,
	pub created_at: DateTime<Utc>,
}

impl From<&progress_entry::Model> for ProgressView {
	fn from(entry: &progress_entry::Model) -> Self {
		Self {
			id: entry.id,
			status: entry.status.clone(),
			status_label: OrderStatus::label_for(&entry.status).to_string(),
			note: entry.note.clone(),
			created_at: entry.created_at,
		}
	}
}

/// Log a status change and move the order to that status.
///
/// Rejected with a validation error on `estatus`, writing nothing, when the
/// requested status equals the order's current one.
pub async fn record_progress(
	db: &DatabaseConnection,
	order_id: i32,
	form: &ProgressForm,
) -> Result<progress_entry::Model> {
	let mut errors = FormErrors::default();
	let status = match form.status.trim() {
		"" => {
			errors.add("estatus", forms::REQUIRED);
			None
		}
		code => OrderStatus::from_code(code).or_else(|| {
			errors.add("estatus", forms::invalid_choice(code));
			None
		}),
	};
	let note = form.note.trim().to_string();
	errors.into_result()?;
	let Some(status) = status else {
		return Err(CoreError::invalid("estatus", forms::REQUIRED));
	};

	let txn = db.begin().await?;

	let Some(order) = Order::find_by_id(order_id).one(&txn).await? else {
		txn.rollback().await?;
		return Err(CoreError::not_found("Order", order_id));
	};

	if order.status == status.code() {
		txn.rollback().await?;
		return Err(CoreError::invalid("estatus", SAME_STATUS));
	}

	let now = Utc::now();
	let entry = progress_entry::ActiveModel {
		order_id: Set(order.id),
		status: Set(status.code().to_string()),
		note: Set(note),
		created_at: Set(now),
		..Default::default()
	}
	.insert(&txn)
	.await?;

	let previous = order.status.clone();
	let mut active: order::ActiveModel = order.into();
	active.status = Set(status.code().to_string());
	active.updated_at = Set(now);
	active.update(&txn).await?;

	txn.commit().await?;

	info!(order_id, "Order moved from {} to {}", previous, status);
	Ok(entry)
}

/// Progress history of an order, newest first
pub async fn list_progress<C: ConnectionTrait>(
	db: &C,
	order_id: i32,
) -> Result<Vec<progress_entry::Model>> {
	Ok(ProgressEntry::find()
		.filter(progress_entry::Column::OrderId.eq(order_id))
		.order_by_desc(progress_entry::Column::CreatedAt)
		.order_by_desc(progress_entry::Column::Id)
		.all(db)
		.await?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::infrastructure::database::Database;
	use crate::operations::orders::{create_order, get_order, tests::sample_form};

	fn form(status: &str, note: &str) -> ProgressForm {
		ProgressForm {
			status: status.to_string(),
			note: note.to_string(),
		}
	}

	#[tokio::test]
	async fn different_status_creates_one_entry_and_moves_order() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();

		let entry = record_progress(db.conn(), order.id, &form("EN_PREPARACION", "Lavado"))
			.await
			.unwrap();

		assert_eq!(entry.status, "EN_PREPARACION");
		assert_eq!(entry.note, "Lavado");
		let history = list_progress(db.conn(), order.id).await.unwrap();
		assert_eq!(history.len(), 1);

		let reloaded = get_order(db.conn(), order.id).await.unwrap();
		assert_eq!(reloaded.status, "EN_PREPARACION");
		assert!(reloaded.updated_at >= order.updated_at);
	}

	#[tokio::test]
	async fn same_status_is_rejected_without_writes() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();

		let err = record_progress(db.conn(), order.id, &form("EN_RECEPCION", ""))
			.await
			.unwrap_err();

		let CoreError::Validation(errors) = err else {
			panic!("expected validation error, got {err:?}");
		};
		assert_eq!(errors.get("estatus"), Some(&[SAME_STATUS.to_string()][..]));
		assert!(list_progress(db.conn(), order.id).await.unwrap().is_empty());
		assert_eq!(get_order(db.conn(), order.id).await.unwrap(), order);
	}

	#[tokio::test]
	async fn any_stage_can_follow_any_other() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();

		for code in ["TRABAJO_TERMINADO", "EN_PROCESO", "EN_RECEPCION"] {
			record_progress(db.conn(), order.id, &form(code, "")).await.unwrap();
		}

		let history = list_progress(db.conn(), order.id).await.unwrap();
		let codes: Vec<_> = history.iter().map(|entry| entry.status.as_str()).collect();
		assert_eq!(codes, vec!["EN_RECEPCION", "EN_PROCESO", "TRABAJO_TERMINADO"]);
	}

	#[tokio::test]
	async fn unknown_status_and_order_are_rejected() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();

		assert!(matches!(
			record_progress(db.conn(), order.id, &form("ENTREGADO", "")).await,
			Err(CoreError::Validation(_))
		));
		assert!(matches!(
			record_progress(db.conn(), order.id + 1, &form("EN_PROCESO", "")).await,
			Err(CoreError::NotFound { .. })
		));
	}
}
