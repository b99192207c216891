use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use wraplab_core::{config::default_data_dir, logging, operations::auth, AppConfig, Database};

mod error;
mod flash;
mod routes;
mod session;
mod state;
mod utils;
mod views;

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "wraplab-server", about = "WrapLab service-order tracker")]
struct Cli {
	/// Directory holding the config file, database and logs
	#[arg(long, env = "DATA_DIR")]
	data_dir: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the HTTP server (default)
	Serve {
		/// Port to listen on, overriding the config file
		#[arg(long)]
		port: Option<u16>,
	},
	/// Apply pending database migrations and exit
	Migrate,
	/// Create a staff account
	CreateUser {
		username: String,
		/// Allow this account to sign in to the dashboard
		#[arg(long, default_value_t = false)]
		superuser: bool,
		#[arg(long, env = "WRAPLAB_PASSWORD", hide_env_values = true)]
		password: String,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let data_dir = match cli.data_dir {
		Some(dir) => dir,
		None => default_data_dir()?,
	};
	let mut config = AppConfig::load_from(&data_dir)
		.with_context(|| format!("Unable to load config from {}", data_dir.display()))?;
	config.apply_env_overrides();

	let _guard = logging::init(&config)?;

	let db = Database::open(&config.database_path()).await?;
	db.migrate().await?;

	match cli.command.unwrap_or(Command::Serve { port: None }) {
		Command::Serve { port } => {
			if let Some(port) = port {
				config.server.port = port;
			}
			serve(db, config).await
		}
		Command::Migrate => Ok(()),
		Command::CreateUser {
			username,
			superuser,
			password,
		} => {
			let user = auth::create_user(db.conn(), &username, &password, superuser).await?;
			println!("Created user {} (superuser: {})", user.username, user.is_superuser);
			Ok(())
		}
	}
}

async fn serve(db: Database, config: AppConfig) -> Result<()> {
	auth::purge_expired_sessions(db.conn(), Utc::now()).await?;

	let (host, port) = (config.server.bind_address.as_str(), config.server.port);
	let listener = TcpListener::bind((host, port))
		.await
		.with_context(|| format!("Unable to bind {host}:{port}"))?;
	info!("Listening on http://{}", listener.local_addr()?);

	let app = routes::router(AppState::new(db, config));
	axum::serve(listener, app)
		.with_graceful_shutdown(utils::axum_shutdown_signal())
		.await
		.context("HTTP server error")?;

	info!("Server stopped");
	Ok(())
}
