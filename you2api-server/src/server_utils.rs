use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use you2api_types::models::AppConfig;

pub async fn create_listener(config: &AppConfig) -> Result<TcpListener> {
    let addr = config.get_socket_addr();
    let listener =
        TcpListener::bind(&addr).await.with_context(|| format!("Failed to bind {}", addr))?;
    info!("🔌 Listening on http://{}", addr);
    Ok(listener)
}

#[allow(
    clippy::expect_used,
    reason = "Signal handlers are critical infrastructure, panic is appropriate on failure"
)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("🛑 Received Ctrl+C, initiating graceful shutdown..."),
        () = terminate => info!("🛑 Received SIGTERM, initiating graceful shutdown..."),
    }

    info!("⏳ Draining in-flight requests...");
}
