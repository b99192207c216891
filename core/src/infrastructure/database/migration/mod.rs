//! Database migrations

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
	fn migrations() -> Vec<Box<dyn MigrationTrait>> {
		vec![
			Box::new(m20250301_000001_create_orders::Migration),
			Box::new(m20250301_000002_create_auth::Migration),
		]
	}
}

mod m20250301_000001_create_orders;
mod m20250301_000002_create_auth;
