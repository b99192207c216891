//! Orders, their progress log and photo gallery, plus appointments

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Orders::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Orders::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(Orders::Folio)
							.string_len(12)
							.not_null()
							.unique_key(),
					)
					.col(ColumnDef::new(Orders::ClientName).string_len(200).not_null())
					.col(ColumnDef::new(Orders::VehicleMake).string_len(80).not_null())
					.col(ColumnDef::new(Orders::VehicleModel).string_len(80).not_null())
					.col(
						ColumnDef::new(Orders::VehiclePlate)
							.string_len(20)
							.not_null()
							.default(""),
					)
					.col(ColumnDef::new(Orders::VehicleYear).integer().not_null())
					.col(ColumnDef::new(Orders::VehicleColor).string_len(80).not_null())
					.col(
						ColumnDef::new(Orders::Service)
							.string_len(12)
							.not_null()
							.default("WRAP"),
					)
					.col(
						ColumnDef::new(Orders::Status)
							.string_len(20)
							.not_null()
							.default("EN_RECEPCION"),
					)
					.col(
						ColumnDef::new(Orders::TotalCostCents)
							.big_integer()
							.not_null()
							.default(0),
					)
					.col(
						ColumnDef::new(Orders::AmountPaidCents)
							.big_integer()
							.not_null()
							.default(0),
					)
					.col(
						ColumnDef::new(Orders::WarningLights)
							.json()
							.not_null()
							.default("[]"),
					)
					.col(ColumnDef::new(Orders::Notes).text().not_null().default(""))
					.col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
					.col(ColumnDef::new(Orders::UpdatedAt).timestamp().not_null())
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_orders_status")
					.table(Orders::Table)
					.col(Orders::Status)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_orders_updated_at")
					.table(Orders::Table)
					.col(Orders::UpdatedAt)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(ProgressEntries::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(ProgressEntries::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(ProgressEntries::OrderId).integer().not_null())
					.col(ColumnDef::new(ProgressEntries::Status).string_len(20).not_null())
					.col(
						ColumnDef::new(ProgressEntries::Note)
							.text()
							.not_null()
							.default(""),
					)
					.col(ColumnDef::new(ProgressEntries::CreatedAt).timestamp().not_null())
					.foreign_key(
						ForeignKey::create()
							.name("fk_progress_entries_order")
							.from(ProgressEntries::Table, ProgressEntries::OrderId)
							.to(Orders::Table, Orders::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_progress_entries_order_id")
					.table(ProgressEntries::Table)
					.col(ProgressEntries::OrderId)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(OrderPhotos::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(OrderPhotos::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(OrderPhotos::OrderId).integer().not_null())
					.col(ColumnDef::new(OrderPhotos::Url).string_len(200).not_null())
					.col(ColumnDef::new(OrderPhotos::Slot).small_integer())
					.col(ColumnDef::new(OrderPhotos::CreatedAt).timestamp().not_null())
					.foreign_key(
						ForeignKey::create()
							.name("fk_order_photos_order")
							.from(OrderPhotos::Table, OrderPhotos::OrderId)
							.to(Orders::Table, Orders::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// One photo per (order, slot); unnumbered rows (NULL slot) are exempt
		manager
			.create_index(
				Index::create()
					.name("idx_order_photos_order_slot")
					.table(OrderPhotos::Table)
					.col(OrderPhotos::OrderId)
					.col(OrderPhotos::Slot)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Appointments::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Appointments::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(Appointments::ClientName)
							.string_len(200)
							.not_null(),
					)
					.col(
						ColumnDef::new(Appointments::ClientContact)
							.string_len(100)
							.not_null()
							.default(""),
					)
					.col(
						ColumnDef::new(Appointments::ScheduledAt)
							.timestamp()
							.not_null(),
					)
					.col(
						ColumnDef::new(Appointments::Kind)
							.string_len(20)
							.not_null()
							.default("PROSPECTO"),
					)
					.col(ColumnDef::new(Appointments::Notes).text().not_null().default(""))
					.col(
						ColumnDef::new(Appointments::Completed)
							.boolean()
							.not_null()
							.default(false),
					)
					.col(ColumnDef::new(Appointments::CreatedAt).timestamp().not_null())
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_appointments_scheduled_at")
					.table(Appointments::Table)
					.col(Appointments::ScheduledAt)
					.to_owned(),
			)
			.await
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Appointments::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(OrderPhotos::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(ProgressEntries::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Orders::Table).to_owned())
			.await
	}
}

#[derive(DeriveIden)]
enum Orders {
	Table,
	Id,
	Folio,
	ClientName,
	VehicleMake,
	VehicleModel,
	VehiclePlate,
	VehicleYear,
	VehicleColor,
	Service,
	Status,
	TotalCostCents,
	AmountPaidCents,
	WarningLights,
	Notes,
	CreatedAt,
	UpdatedAt,
}

#[derive(DeriveIden)]
enum ProgressEntries {
	Table,
	Id,
	OrderId,
	Status,
	Note,
	CreatedAt,
}

#[derive(DeriveIden)]
enum OrderPhotos {
	Table,
	Id,
	OrderId,
	Url,
	Slot,
	CreatedAt,
}

#[derive(DeriveIden)]
enum Appointments {
	Table,
	Id,
	ClientName,
	ClientContact,
	ScheduledAt,
	Kind,
	Notes,
	Completed,
	CreatedAt,
}
