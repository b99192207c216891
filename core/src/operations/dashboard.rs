//! Staff dashboard: order search plus upcoming appointments

use super::appointments::{list_upcoming, AppointmentView};
use super::orders::OrderView;
use crate::common::errors::Result;
use crate::domain::OrderStatus;
use crate::infrastructure::database::entities::{order, Order};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
	/// Search text as applied, trimmed
	pub query: String,
	pub active: Vec<OrderView>,
	pub completed: Vec<OrderView>,
	pub upcoming_appointments: Vec<AppointmentView>,
}

/// Substring pattern with LIKE wildcards in the search text escaped
fn contains(query: &str) -> LikeExpr {
	let escaped = query
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_");
	LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Orders matching `query`, most recently touched first. A blank query
/// matches everything.
pub async fn search_orders(db: &DatabaseConnection, query: &str) -> Result<Vec<order::Model>> {
	let query = query.trim();
	let mut select = Order::find();
	if !query.is_empty() {
		select = select.filter(
			Condition::any()
				.add(order::Column::Folio.like(contains(query)))
				.add(order::Column::VehicleMake.like(contains(query)))
				.add(order::Column::VehicleModel.like(contains(query)))
				.add(order::Column::VehiclePlate.like(contains(query)))
				.add(order::Column::Status.like(contains(query)))
				.add(order::Column::ClientName.like(contains(query))),
		);
	}
	Ok(select
		.order_by_desc(order::Column::UpdatedAt)
		.order_by_desc(order::Column::Id)
		.all(db)
		.await?)
}

pub async fn dashboard(
	db: &DatabaseConnection,
	query: &str,
	now: DateTime<Utc>,
) -> Result<DashboardView> {
	let query = query.trim().to_string();
	let orders = search_orders(db, &query).await?;
	debug!(matches = orders.len(), "Dashboard search for {:?}", query);

	let (completed, active): (Vec<_>, Vec<_>) = orders
		.iter()
		.partition(|order| order.status == OrderStatus::TERMINAL.code());

	let upcoming = list_upcoming(db, now).await?;

	Ok(DashboardView {
		query,
		active: active.into_iter().map(OrderView::from).collect(),
		completed: completed.into_iter().map(OrderView::from).collect(),
		upcoming_appointments: upcoming.iter().map(AppointmentView::from).collect(),
	})
}
