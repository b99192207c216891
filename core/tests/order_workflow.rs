//! End-to-end order workflow: intake, progress, costs, gallery and public tracking

use rust_decimal::Decimal;
use std::str::FromStr;
use wraplab_core::{
	operations::{
		costs::{update_costs, CostsForm},
		gallery::{gallery_slots, save_gallery, GallerySubmission},
		lookup::lookup,
		orders::{create_order, delete_order, get_order, OrderForm},
		progress::{list_progress, record_progress, ProgressForm},
	},
	CoreError, Database,
};

fn intake() -> OrderForm {
	OrderForm {
		client_name: "Roberto Díaz".to_string(),
		vehicle_make: "BMW".to_string(),
		vehicle_model: "M3".to_string(),
		vehicle_plate: "JAL-4412".to_string(),
		vehicle_year: "2021".to_string(),
		vehicle_color: "Azul".to_string(),
		service: "WRAP_PPF".to_string(),
		warning_lights: vec!["tire".to_string()],
		..Default::default()
	}
}

fn advance(status: &str) -> ProgressForm {
	ProgressForm {
		status: status.to_string(),
		note: String::new(),
	}
}

#[tokio::test]
async fn order_moves_through_the_shop() {
	let db = Database::in_memory().await.unwrap();
	let order = create_order(db.conn(), &intake()).await.unwrap();

	for status in [
		"EN_PREPARACION",
		"EN_PROCESO",
		"PREPARANDO_ENTREGA",
		"TRABAJO_TERMINADO",
	] {
		record_progress(db.conn(), order.id, &advance(status))
			.await
			.unwrap();
	}
	assert!(matches!(
		record_progress(db.conn(), order.id, &advance("TRABAJO_TERMINADO")).await,
		Err(CoreError::Validation(_))
	));

	update_costs(
		db.conn(),
		order.id,
		&CostsForm {
			total_cost: "32000".to_string(),
			amount_paid: "32000".to_string(),
		},
	)
	.await
	.unwrap();

	let mut submission = GallerySubmission::default();
	submission.set(1, "https://fotos.example.com/frente.jpg");
	submission.set(4, "https://fotos.example.com/extra.jpg");
	save_gallery(db.conn(), order.id, &submission).await.unwrap();

	let finished = get_order(db.conn(), order.id).await.unwrap();
	assert!(finished.is_completed());
	assert_eq!(finished.balance_due(), Decimal::from_str("0").unwrap());

	let slots = gallery_slots(db.conn(), order.id).await.unwrap();
	assert_eq!(slots[3].label, "Foto 4");
	assert!(slots[3].url.is_some());

	let tracking = lookup(db.conn(), &format!(" {} ", order.folio.to_lowercase()))
		.await
		.unwrap();
	assert_eq!(tracking.current_step, 4);
	assert_eq!(tracking.progress.len(), 4);
	assert_eq!(tracking.progress[0].status, "TRABAJO_TERMINADO");
	assert_eq!(tracking.photos.len(), 2);
	assert_eq!(tracking.order.warning_lights[0].label, "Presión de Llantas");
}

#[tokio::test]
async fn deleting_an_order_removes_its_history() {
	let db = Database::in_memory().await.unwrap();
	let order = create_order(db.conn(), &intake()).await.unwrap();
	record_progress(db.conn(), order.id, &advance("EN_PROCESO"))
		.await
		.unwrap();

	delete_order(db.conn(), order.id).await.unwrap();

	assert!(list_progress(db.conn(), order.id).await.unwrap().is_empty());
	assert!(matches!(
		lookup(db.conn(), &order.folio).await,
		Err(CoreError::NotFound { .. })
	));
}
