//! 차트 알림 릴레이 서버.
//!
//! 웹훅으로 받은 알림을 텔레그램 채팅으로 전달합니다.
//!
//! ```bash
//! alert-relay --config config/default.toml
//! ```

use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;

use alert_api::{create_router, AppState};
use alert_core::{init_logging, AppConfig};
use alert_notification::TelegramClient;
use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "alert-relay")]
#[command(about = "Relay chart webhook alerts to a Telegram chat", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, env = "ALERT_CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    init_logging(&config.logging)?;

    let addr = config.server.socket_addr()?;

    let client = TelegramClient::from_config(&config.telegram)
        .context("failed to configure telegram client")?;
    info!(chat_id = client.chat_id(), "Telegram client configured");

    let state = Arc::new(
        AppState::new(Arc::new(client)).with_delivery_timeout(config.delivery.timeout()),
    );
    info!(
        version = %state.version,
        delivery_timeout_secs = config.delivery.timeout_secs,
        "Application state initialized"
    );

    let app = create_router(state, config.server.request_timeout());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Alert relay listening");

    let shutdown_token = CancellationToken::new();

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let serve_token = shutdown_token.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { serve_token.cancelled().await })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("server error")?;
            return Ok(());
        }
        _ = shutdown_token.cancelled() => {}
    }

    // 진행 중인 요청은 유예 시간까지만 기다린다
    let grace = config.server.shutdown_grace();
    info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.context("server error during shutdown")?,
        Err(_) => warn!("Graceful shutdown timed out, forcing exit"),
    }

    info!("Server stopped");
    Ok(())
}

/// Ctrl+C 또는 SIGTERM 시그널 대기.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
