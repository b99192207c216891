use std::sync::Arc;

use sea_orm::DatabaseConnection;
use wraplab_core::{AppConfig, Database};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
	pub db: Database,
	pub config: Arc<AppConfig>,
}

impl AppState {
	pub fn new(db: Database, config: AppConfig) -> Self {
		Self {
			db,
			config: Arc::new(config),
		}
	}

	pub fn conn(&self) -> &DatabaseConnection {
		self.db.conn()
	}

	pub fn session_ttl(&self) -> chrono::Duration {
		chrono::Duration::hours(i64::from(self.config.server.session_ttl_hours))
	}

	/// Absolute link a customer can open to follow their order
	pub fn tracking_url(&self, host: Option<&str>, folio: &str) -> String {
		let path = crate::views::tracking_path(folio);
		match (&self.config.server.public_url, host) {
			(Some(base), _) => format!("{}{}", base.trim_end_matches('/'), path),
			(None, Some(host)) => format!("http://{host}{path}"),
			(None, None) => path,
		}
	}
}
