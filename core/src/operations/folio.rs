//! Public order identifiers.
//!
//! A folio is ten characters drawn from uppercase letters and digits with the
//! easily confused glyphs removed (`0`/`O`, `1`/`I`). It is generated once,
//! when an order is first inserted, and never changes afterwards.

use crate::common::errors::{CoreError, Result};
use crate::infrastructure::database::entities::{order, Order};
use rand::Rng;
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
	SqlErr,
};
use tracing::{debug, warn};

pub const FOLIO_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const FOLIO_LENGTH: usize = 10;

/// Attempts before giving up. With 32^10 possible folios a single retry is already rare.
pub const MAX_FOLIO_ATTEMPTS: usize = 32;

/// Draw a random candidate; uniqueness is not checked
pub fn generate_folio() -> String {
	let mut rng = rand::thread_rng();
	(0..FOLIO_LENGTH)
		.map(|_| FOLIO_ALPHABET[rng.gen_range(0..FOLIO_ALPHABET.len())] as char)
		.collect()
}

/// Whether `candidate` has the shape of a generated folio
pub fn is_well_formed(candidate: &str) -> bool {
	candidate.len() == FOLIO_LENGTH && candidate.bytes().all(|b| FOLIO_ALPHABET.contains(&b))
}

pub async fn folio_exists<C: ConnectionTrait>(db: &C, folio: &str) -> Result<bool> {
	let count = Order::find()
		.filter(order::Column::Folio.eq(folio))
		.count(db)
		.await?;
	Ok(count > 0)
}

/// Insert an order, assigning it a folio no other order holds.
///
/// `next_candidate` supplies folios (normally [`generate_folio`]). Candidates
/// already taken are skipped; a unique-constraint violation on insert (another
/// request inserted the same folio in between) is treated the same way.
pub async fn insert_with_unique_folio<C, F>(
	db: &C,
	mut order: order::ActiveModel,
	mut next_candidate: F,
) -> Result<order::Model>
where
	C: ConnectionTrait,
	F: FnMut() -> String,
{
	for attempt in 1..=MAX_FOLIO_ATTEMPTS {
		let candidate = next_candidate();
		if folio_exists(db, &candidate).await? {
			debug!(attempt, "Folio {} already taken, regenerating", candidate);
			continue;
		}

		order.folio = Set(candidate.clone());
		match order.clone().insert(db).await {
			Ok(model) => return Ok(model),
			Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
				warn!(attempt, "Folio {} collided on insert, regenerating", candidate);
			}
			Err(err) => return Err(err.into()),
		}
	}

	Err(CoreError::FolioExhausted {
		attempts: MAX_FOLIO_ATTEMPTS,
	})
}
