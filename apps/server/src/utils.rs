use tokio::signal;
use tracing::info;

/// Resolves on Ctrl+C or, on unix, SIGTERM
pub async fn axum_shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = signal::ctrl_c().await {
			tracing::error!("Failed to install Ctrl+C handler: {}", err);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(err) => {
				tracing::error!("Failed to install SIGTERM handler: {}", err);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received, stopping server");
}
