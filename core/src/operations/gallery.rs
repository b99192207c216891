//! Ten-slot photo gallery of an order.
//!
//! Staff edit the gallery as a whole: one URL (or nothing) per slot. Saving
//! reconciles the submission against the stored photos slot by slot.

use crate::common::errors::{CoreError, FormErrors, Result};
use crate::common::forms;
use crate::domain::gallery::{field_name, is_valid_slot, slot_label, slots, SLOT_COUNT};
use crate::infrastructure::database::entities::{order, order_photo, Order, OrderPhoto};
use chrono::{DateTime, Utc};
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
	QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Longest URL a photo may hold
pub const MAX_URL_LENGTH: usize = 200;

/// One optional URL per slot; index 0 is slot 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GallerySubmission(pub [Option<String>; SLOT_COUNT]);

impl GallerySubmission {
	/// Collect `foto_1`..`foto_10` from submitted form fields. Missing fields
	/// count as empty slots.
	pub fn from_fields(fields: &HashMap<String, String>) -> Self {
		let mut urls: [Option<String>; SLOT_COUNT] = Default::default();
		for slot in slots() {
			urls[usize::from(slot) - 1] = fields.get(&field_name(slot)).cloned();
		}
		Self(urls)
	}

	pub fn set(&mut self, slot: u8, url: impl Into<String>) {
		if let Some(entry) = self.0.get_mut(usize::from(slot).wrapping_sub(1)) {
			*entry = Some(url.into());
		}
	}

	/// Trimmed value submitted for `slot`, `None` when blank
	pub fn get(&self, slot: u8) -> Option<&str> {
		self.0
			.get(usize::from(slot).wrapping_sub(1))?
			.as_deref()
			.map(str::trim)
			.filter(|url| !url.is_empty())
	}
}

/// Writes performed by [`save_gallery`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GalleryChanges {
	pub created: usize,
	pub updated: usize,
	pub deleted: usize,
}

impl GalleryChanges {
	pub fn is_empty(&self) -> bool {
		self.created + self.updated + self.deleted == 0
	}
}

/// A slot as shown in the gallery form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GallerySlot {
	pub slot: u8,
	pub field: String,
	pub label: String,
	pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoView {
	pub id: i32,
	pub url: String,
	pub slot: Option<i32>,
	pub label: String,
	pub created_at: DateTime<Utc>,
}

impl From<&order_photo::Model> for PhotoView {
	fn from(photo: &order_photo::Model) -> Self {
		let label = match photo.slot {
			Some(slot) if is_valid_slot(slot) => slot_label(slot as u8),
			_ => "Foto".to_string(),
		};
		Self {
			id: photo.id,
			url: photo.url.clone(),
			slot: photo.slot,
			label,
			created_at: photo.created_at,
		}
	}
}

/// Photos of an order by slot ascending, newest first within a slot.
/// Unnumbered photos sort first, as SQLite orders NULL before any value.
pub async fn list_photos<C: ConnectionTrait>(
	db: &C,
	order_id: i32,
) -> Result<Vec<order_photo::Model>> {
	Ok(OrderPhoto::find()
		.filter(order_photo::Column::OrderId.eq(order_id))
		.order_by_asc(order_photo::Column::Slot)
		.order_by_desc(order_photo::Column::CreatedAt)
		.order_by_desc(order_photo::Column::Id)
		.all(db)
		.await?)
}

/// Give every unnumbered photo of an order a slot.
///
/// This writes: photos without a slot are taken in arrival order and each is
/// moved to the lowest free slot, persisted immediately. Photos left over once
/// all ten slots are taken stay unnumbered. The order's `updated_at` moves
/// only when something was numbered. Returns how many were numbered.
pub async fn repair_gallery<C: ConnectionTrait>(db: &C, order_id: i32) -> Result<usize> {
	let photos = OrderPhoto::find()
		.filter(order_photo::Column::OrderId.eq(order_id))
		.order_by_asc(order_photo::Column::CreatedAt)
		.order_by_asc(order_photo::Column::Id)
		.all(db)
		.await?;

	let mut taken = [false; SLOT_COUNT];
	for slot in photos.iter().filter_map(|photo| photo.slot) {
		if is_valid_slot(slot) {
			taken[(slot - 1) as usize] = true;
		}
	}

	let mut repaired = 0;
	for photo in photos.into_iter().filter(|photo| photo.slot.is_none()) {
		let Some(free) = taken.iter().position(|used| !used) else {
			break;
		};
		taken[free] = true;

		let slot = free as i32 + 1;
		debug!(order_id, photo_id = photo.id, slot, "Numbering unslotted photo");
		let mut active: order_photo::ActiveModel = photo.into();
		active.slot = Set(Some(slot));
		active.update(db).await?;
		repaired += 1;
	}

	if repaired > 0 {
		order::ActiveModel {
			id: Set(order_id),
			updated_at: Set(Utc::now()),
			..Default::default()
		}
		.update(db)
		.await?;
		info!(order_id, repaired, "Repaired gallery slots");
	}
	Ok(repaired)
}

/// The ten slots of an order with their current URLs
pub async fn gallery_slots<C: ConnectionTrait>(db: &C, order_id: i32) -> Result<Vec<GallerySlot>> {
	let by_slot = photos_by_slot(db, order_id).await?;
	Ok(slots()
		.map(|slot| GallerySlot {
			slot,
			field: field_name(slot),
			label: slot_label(slot),
			url: by_slot.get(&slot).map(|photo| photo.url.clone()),
		})
		.collect())
}

/// Reconcile the stored gallery with a submission.
///
/// Every non-blank value must be an http(s) URL; any invalid slot rejects the
/// whole submission. Per slot: a new URL inserts, a different URL updates, a
/// blank value deletes and an unchanged URL writes nothing. The order's
/// `updated_at` moves only when something was written.
pub async fn save_gallery(
	db: &DatabaseConnection,
	order_id: i32,
	submission: &GallerySubmission,
) -> Result<GalleryChanges> {
	let mut errors = FormErrors::default();
	let mut wanted: [Option<String>; SLOT_COUNT] = Default::default();
	for slot in slots() {
		let Some(raw) = submission.get(slot) else {
			continue;
		};
		let field = field_name(slot);
		let url = forms::optional_text(&mut errors, &field, raw, MAX_URL_LENGTH)
			.and_then(|url| forms::http_url(&mut errors, &field, &url));
		wanted[usize::from(slot) - 1] = url;
	}
	errors.into_result()?;

	let txn = db.begin().await?;

	let Some(order) = Order::find_by_id(order_id).one(&txn).await? else {
		txn.rollback().await?;
		return Err(CoreError::not_found("Order", order_id));
	};

	repair_gallery(&txn, order_id).await?;
	let mut existing = photos_by_slot(&txn, order_id).await?;

	let now = Utc::now();
	let mut changes = GalleryChanges::default();
	for slot in slots() {
		let url = wanted[usize::from(slot) - 1].take();
		match (existing.remove(&slot), url) {
			(None, Some(url)) => {
				order_photo::ActiveModel {
					order_id: Set(order_id),
					url: Set(url),
					slot: Set(Some(i32::from(slot))),
					created_at: Set(now),
					..Default::default()
				}
				.insert(&txn)
				.await?;
				changes.created += 1;
			}
			(Some(photo), Some(url)) if photo.url != url => {
				let mut active: order_photo::ActiveModel = photo.into();
				active.url = Set(url);
				active.update(&txn).await?;
				changes.updated += 1;
			}
			(Some(photo), None) => {
				photo.delete(&txn).await?;
				changes.deleted += 1;
			}
			_ => {}
		}
	}

	if !changes.is_empty() {
		let folio = order.folio.clone();
		let mut active: order::ActiveModel = order.into();
		active.updated_at = Set(now);
		active.update(&txn).await?;
		info!(
			order_id,
			created = changes.created,
			updated = changes.updated,
			deleted = changes.deleted,
			"Saved gallery of order {}",
			folio
		);
	}

	txn.commit().await?;
	Ok(changes)
}

async fn photos_by_slot<C: ConnectionTrait>(
	db: &C,
	order_id: i32,
) -> Result<BTreeMap<u8, order_photo::Model>> {
	let photos = OrderPhoto::find()
		.filter(order_photo::Column::OrderId.eq(order_id))
		.filter(order_photo::Column::Slot.is_not_null())
		.all(db)
		.await?;

	Ok(photos
		.into_iter()
		.filter_map(|photo| match photo.slot {
			Some(slot) if is_valid_slot(slot) => Some((slot as u8, photo)),
			_ => None,
		})
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::infrastructure::database::Database;
	use crate::operations::orders::{create_order, get_order, tests::sample_form};
	use chrono::Duration;

	async fn add_photo(db: &Database, order_id: i32, url: &str, slot: Option<i32>, age_secs: i64) {
		order_photo::ActiveModel {
			order_id: Set(order_id),
			url: Set(url.to_string()),
			slot: Set(slot),
			created_at: Set(Utc::now() - Duration::seconds(age_secs)),
			..Default::default()
		}
		.insert(db.conn())
		.await
		.unwrap();
	}

	fn urls(slots: &[GallerySlot]) -> Vec<Option<&str>> {
		slots.iter().map(|slot| slot.url.as_deref()).collect()
	}

	#[tokio::test]
	async fn blank_slot_deletes_and_filled_slot_creates() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();
		add_photo(&db, order.id, "http://b", Some(2), 10).await;

		let mut fields = HashMap::new();
		fields.insert("foto_1".to_string(), "http://a".to_string());
		fields.insert("foto_2".to_string(), String::new());
		let changes = save_gallery(db.conn(), order.id, &GallerySubmission::from_fields(&fields))
			.await
			.unwrap();

		assert_eq!(
			changes,
			GalleryChanges {
				created: 1,
				updated: 0,
				deleted: 1
			}
		);
		let slots = gallery_slots(db.conn(), order.id).await.unwrap();
		assert_eq!(slots[0].url.as_deref(), Some("http://a"));
		assert_eq!(slots[1].url, None);
		assert!(get_order(db.conn(), order.id).await.unwrap().updated_at >= order.updated_at);
	}

	#[tokio::test]
	async fn identical_resubmission_writes_nothing() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();

		let mut submission = GallerySubmission::default();
		submission.set(1, "http://a");
		submission.set(7, "https://cdn.example.com/roof.jpg");
		save_gallery(db.conn(), order.id, &submission).await.unwrap();

		let before = list_photos(db.conn(), order.id).await.unwrap();
		let stamped = get_order(db.conn(), order.id).await.unwrap().updated_at;

		let changes = save_gallery(db.conn(), order.id, &submission).await.unwrap();
		assert!(changes.is_empty());
		assert_eq!(list_photos(db.conn(), order.id).await.unwrap(), before);
		assert_eq!(get_order(db.conn(), order.id).await.unwrap().updated_at, stamped);
	}

	#[tokio::test]
	async fn changed_url_updates_in_place() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();
		add_photo(&db, order.id, "http://old", Some(3), 10).await;
		let original = list_photos(db.conn(), order.id).await.unwrap();

		let mut submission = GallerySubmission::default();
		submission.set(3, "  http://new  ");
		let changes = save_gallery(db.conn(), order.id, &submission).await.unwrap();

		assert_eq!(changes.updated, 1);
		let photos = list_photos(db.conn(), order.id).await.unwrap();
		assert_eq!(photos.len(), 1);
		assert_eq!(photos[0].id, original[0].id);
		assert_eq!(photos[0].url, "http://new");
	}

	#[tokio::test]
	async fn one_bad_url_rejects_the_whole_submission() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();

		let mut submission = GallerySubmission::default();
		submission.set(1, "http://a");
		submission.set(5, "ftp://files/side.jpg");
		submission.set(6, format!("http://x/{}", "a".repeat(MAX_URL_LENGTH)));

		let Err(CoreError::Validation(errors)) =
			save_gallery(db.conn(), order.id, &submission).await
		else {
			panic!("expected validation error");
		};
		assert!(errors.contains("foto_5"));
		assert!(errors.contains("foto_6"));
		assert!(!errors.contains("foto_1"));
		assert!(list_photos(db.conn(), order.id).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn repair_numbers_unslotted_photos_in_arrival_order() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();
		add_photo(&db, order.id, "http://taken", Some(1), 50).await;
		add_photo(&db, order.id, "http://second", None, 20).await;
		add_photo(&db, order.id, "http://first", None, 40).await;

		assert_eq!(repair_gallery(db.conn(), order.id).await.unwrap(), 2);
		assert_eq!(repair_gallery(db.conn(), order.id).await.unwrap(), 0);

		let slots = gallery_slots(db.conn(), order.id).await.unwrap();
		assert_eq!(
			&urls(&slots)[..4],
			&[Some("http://taken"), Some("http://first"), Some("http://second"), None]
		);
		assert_eq!(slots[3].label, "Foto 4");
	}

	#[tokio::test]
	async fn repair_touches_the_order_only_when_it_numbers_photos() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();
		let stale = Utc::now() - Duration::days(3);
		order::ActiveModel {
			id: Set(order.id),
			updated_at: Set(stale),
			..Default::default()
		}
		.update(db.conn())
		.await
		.unwrap();

		assert_eq!(repair_gallery(db.conn(), order.id).await.unwrap(), 0);
		let untouched = get_order(db.conn(), order.id).await.unwrap();
		assert!(untouched.updated_at < Utc::now() - Duration::days(2));

		add_photo(&db, order.id, "http://loose", None, 10).await;
		assert_eq!(repair_gallery(db.conn(), order.id).await.unwrap(), 1);
		let touched = get_order(db.conn(), order.id).await.unwrap();
		assert!(touched.updated_at > Utc::now() - Duration::days(1));
	}

	#[tokio::test]
	async fn repair_leaves_overflow_unnumbered() {
		let db = Database::in_memory().await.unwrap();
		let order = create_order(db.conn(), &sample_form()).await.unwrap();
		for slot in 1..=10 {
			add_photo(&db, order.id, &format!("http://p/{slot}"), Some(slot), 30).await;
		}
		add_photo(&db, order.id, "http://extra", None, 5).await;

		assert_eq!(repair_gallery(db.conn(), order.id).await.unwrap(), 0);
		let photos = list_photos(db.conn(), order.id).await.unwrap();
		assert_eq!(photos.len(), 11);
		assert!(photos.iter().any(|photo| photo.slot.is_none()));
	}

	#[tokio::test]
	async fn missing_order_is_not_found() {
		let db = Database::in_memory().await.unwrap();
		assert!(matches!(
			save_gallery(db.conn(), 9, &GallerySubmission::default()).await,
			Err(CoreError::NotFound { .. })
		));
	}

	#[test]
	fn submission_reads_slot_fields() {
		let mut fields = HashMap::new();
		fields.insert("foto_10".to_string(), " http://dash ".to_string());
		fields.insert("foto_3".to_string(), "   ".to_string());
		fields.insert("foto_11".to_string(), "http://ignored".to_string());
		let submission = GallerySubmission::from_fields(&fields);

		assert_eq!(submission.get(10), Some("http://dash"));
		assert_eq!(submission.get(3), None);
		assert_eq!(submission.get(0), None);
		assert_eq!(submission.get(11), None);
	}
}
