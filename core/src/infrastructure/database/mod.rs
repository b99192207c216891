//! Database infrastructure using SeaORM

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod entities;
pub mod migration;

/// Database wrapper for the shop's SQLite store
#[derive(Clone, Debug)]
pub struct Database {
	/// SeaORM database connection
	conn: DatabaseConnection,
}

impl Database {
	/// Open the database at `path`, creating the file if needed
	pub async fn open(path: &Path) -> Result<Self, DbErr> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)
				.map_err(|e| DbErr::Custom(format!("Failed to create directory: {}", e)))?;
		}

		let db_url = format!("sqlite://{}?mode=rwc", path.display());

		let mut opt = ConnectOptions::new(db_url);
		opt.max_connections(10)
			.min_connections(1)
			.connect_timeout(Duration::from_secs(8))
			.idle_timeout(Duration::from_secs(300))
			.sqlx_logging(false); // We'll use tracing instead

		let conn = SeaDatabase::connect(opt).await?;

		info!("Opened database at {:?}", path);

		Ok(Self { conn })
	}

	/// Fresh, migrated in-memory database. Limited to one pooled connection
	/// because every SQLite `:memory:` connection is its own database.
	pub async fn in_memory() -> Result<Self, DbErr> {
		let mut opt = ConnectOptions::new("sqlite::memory:");
		opt.max_connections(1)
			.min_connections(1)
			.sqlx_logging(false);

		let db = Self {
			conn: SeaDatabase::connect(opt).await?,
		};
		db.migrate().await?;
		Ok(db)
	}

	/// Run migrations
	pub async fn migrate(&self) -> Result<(), DbErr> {
		migration::Migrator::up(&self.conn, None).await?;
		info!("Database migrations completed successfully");
		Ok(())
	}

	/// Get the database connection
	pub fn conn(&self) -> &DatabaseConnection {
		&self.conn
	}
}
