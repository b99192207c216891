//! Application configuration

use super::default_data_dir;
use crate::config::migration::Migrate;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CONFIG_FILE: &str = "wraplab.json";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
	/// Config schema version
	pub version: u32,

	/// Data directory path
	pub data_dir: PathBuf,

	/// Logging level, used when `RUST_LOG` is unset
	pub log_level: String,

	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// SQLite file name, relative to `data_dir`
	#[serde(default = "default_database_file")]
	pub database_file: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
	pub bind_address: String,

	pub port: u16,

	/// How long a staff session stays valid
	pub session_ttl_hours: u32,

	/// Base URL used for customer tracking links (e.g. `https://taller.example.com`).
	/// When unset the request's `Host` header is used.
	pub public_url: Option<String>,

	/// Mark session cookies `Secure` (only sent over HTTPS)
	pub secure_cookies: bool,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind_address: "0.0.0.0".to_string(),
			port: 8080,
			session_ttl_hours: 24 * 14,
			public_url: None,
			secure_cookies: false,
		}
	}
}

fn default_database_file() -> String {
	"wraplab.db".to_string()
}

impl AppConfig {
	/// Load configuration from the default location
	pub fn load() -> Result<Self> {
		let data_dir = default_data_dir()?;
		Self::load_from(&data_dir)
	}

	/// Load configuration from a specific data directory, creating a default file if missing
	pub fn load_from(data_dir: &Path) -> Result<Self> {
		let config_path = data_dir.join(CONFIG_FILE);

		if config_path.exists() {
			info!("Loading config from {:?}", config_path);
			let json = fs::read_to_string(&config_path)?;
			let mut config: AppConfig = serde_json::from_str(&json)
				.with_context(|| format!("Invalid config file {}", config_path.display()))?;

			// The directory we were asked to load from wins over a stale stored path
			config.data_dir = data_dir.to_path_buf();

			if config.needs_migration() {
				info!(
					"Migrating config from v{} to v{}",
					config.version,
					Self::target_version()
				);
				config.migrate()?;
				config.save()?;
			}

			Ok(config)
		} else {
			warn!("No config found, creating default at {:?}", config_path);
			let config = Self::default_with_dir(data_dir.to_path_buf());
			config.save()?;
			Ok(config)
		}
	}

	/// Create default configuration with specific data directory
	pub fn default_with_dir(data_dir: PathBuf) -> Self {
		Self {
			version: Self::target_version(),
			data_dir,
			log_level: "info".to_string(),
			server: ServerConfig::default(),
			database_file: default_database_file(),
		}
	}

	/// Apply `PORT` from the environment, if set and valid
	pub fn apply_env_overrides(&mut self) {
		if let Ok(port) = std::env::var("PORT") {
			match port.parse::<u16>() {
				Ok(port) => self.server.port = port,
				Err(_) => warn!("Ignoring invalid PORT value {:?}", port),
			}
		}
	}

	/// Save configuration to disk
	pub fn save(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;

		let config_path = self.data_dir.join(CONFIG_FILE);
		let json = serde_json::to_string_pretty(self)?;
		fs::write(&config_path, json)?;
		info!("Saved config to {:?}", config_path);
		Ok(())
	}

	/// Get the path for logs directory
	pub fn logs_dir(&self) -> PathBuf {
		self.data_dir.join("logs")
	}

	/// Get the path of the SQLite database
	pub fn database_path(&self) -> PathBuf {
		self.data_dir.join(&self.database_file)
	}

	/// Ensure all required directories exist
	pub fn ensure_directories(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;
		fs::create_dir_all(self.logs_dir())?;
		Ok(())
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		let data_dir = default_data_dir().unwrap_or_else(|_| PathBuf::from("."));
		Self::default_with_dir(data_dir)
	}
}

impl Migrate for AppConfig {
	fn current_version(&self) -> u32 {
		self.version
	}

	fn target_version() -> u32 {
		1
	}

	fn migrate(&mut self) -> Result<()> {
		match self.version {
			0 => {
				// v0 files predate the `server` section; serde defaults already filled it
				self.version = 1;
				Ok(())
			}
			1 => Ok(()),
			v => Err(anyhow!("Unknown config version: {}", v)),
		}
	}
}
