mod config;
mod error;
mod executor;
mod log_buffer;
mod orchestrator;
mod routes;
mod server;
mod settings;
mod state;

use clap::Parser;
use std::sync::Arc;
use tracing::info;

use config::{CliArgs, ConsoleConfig};
use executor::SimulatedExecutor;
use log_buffer::LogLevel;
use state::ConsoleState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = ConsoleConfig::from_args(args);

    // Initialize tracing; keep the appender guard alive for the process
    // lifetime when logging to a file.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feedbot_console=info,tower_http=info".into());
    let _appender_guard = match &config.log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| "feedbot-console.log".to_string());
            let appender = tracing_appender::rolling::never(dir, file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    };

    info!("Starting feedbot-console v{}", env!("CARGO_PKG_VERSION"));
    info!("Data dir: {:?}", config.data_dir);

    let bot_config = settings::load_settings(&settings::settings_path(&config));
    let port = config.port;

    let state = Arc::new(ConsoleState::new(
        config,
        bot_config,
        Arc::new(SimulatedExecutor::new()),
    ));

    // Log startup
    state
        .logs
        .append(
            LogLevel::Info,
            format!("Console started on port {}", port),
            None,
        )
        .await;

    // Build and start HTTP server
    let router = server::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Console listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await?;

    info!("Console shutting down");

    // Stop any active run on shutdown
    if state.bot.status().is_running {
        info!("Stopping active run before exit...");
        state.bot.stop().await;
    }

    Ok(())
}

async fn shutdown_signal(state: Arc<ConsoleState>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    ctrl_c.await;
    info!("Received shutdown signal");
    state.notify_shutdown();
    state
        .logs
        .append(LogLevel::Info, "Shutdown signal received", None)
        .await;
}
