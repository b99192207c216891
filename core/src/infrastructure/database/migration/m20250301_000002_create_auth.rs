//! Staff users and their login sessions

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Users::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Users::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(Users::Username)
							.string_len(150)
							.not_null()
							.unique_key(),
					)
					.col(ColumnDef::new(Users::PasswordHash).text().not_null())
					.col(
						ColumnDef::new(Users::IsSuperuser)
							.boolean()
							.not_null()
							.default(false),
					)
					.col(
						ColumnDef::new(Users::IsActive)
							.boolean()
							.not_null()
							.default(true),
					)
					.col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
					.col(ColumnDef::new(Users::LastLoginAt).timestamp())
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Sessions::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Sessions::Token)
							.string_len(64)
							.not_null()
							.primary_key(),
					)
					.col(ColumnDef::new(Sessions::UserId).integer().not_null())
					.col(ColumnDef::new(Sessions::CreatedAt).timestamp().not_null())
					.col(ColumnDef::new(Sessions::ExpiresAt).timestamp().not_null())
					.foreign_key(
						ForeignKey::create()
							.name("fk_sessions_user")
							.from(Sessions::Table, Sessions::UserId)
							.to(Users::Table, Users::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_sessions_user_id")
					.table(Sessions::Table)
					.col(Sessions::UserId)
					.to_owned(),
			)
			.await
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Sessions::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Users::Table).to_owned())
			.await
	}
}

#[derive(DeriveIden)]
enum Users {
	Table,
	Id,
	Username,
	PasswordHash,
	IsSuperuser,
	IsActive,
	CreatedAt,
	LastLoginAt,
}

#[derive(DeriveIden)]
enum Sessions {
	Table,
	Token,
	UserId,
	CreatedAt,
	ExpiresAt,
}
