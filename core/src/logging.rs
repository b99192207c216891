//! Tracing setup: console output plus a daily-rolling file under `<data_dir>/logs`

use crate::config::AppConfig;
use anyhow::Result;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file writer and must be held for the lifetime of the process.
pub fn init(config: &AppConfig) -> Result<WorkerGuard> {
	config.ensure_directories()?;

	let (file_writer, guard) =
		tracing_appender::non_blocking(rolling::daily(config.logs_dir(), "wraplab.log"));

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(format!(
			"{level},wraplab_core={level},wraplab_server={level},sqlx=warn",
			level = config.log_level
		))
	});

	let file_layer = fmt::layer()
		.with_writer(file_writer)
		.with_ansi(false)
		.with_target(true)
		.with_line_number(true);

	let console_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false);

	tracing_subscriber::registry()
		.with(filter)
		.with(file_layer)
		.with(console_layer)
		.try_init()?;

	tracing::info!("Logging initialized, writing to {}", config.logs_dir().display());
	Ok(guard)
}
