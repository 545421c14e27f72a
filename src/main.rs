// src/main.rs

use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use cerebro::{
    config::Config, generator::QuizGenerator, routes, state::AppState, store::SessionStore,
    utils::gemini::GeminiClient,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from environment (.env included)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let gemini = match GeminiClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build Gemini client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(model = %config.gemini_model, "Quiz model configured");

    let state = AppState {
        sessions: SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes)),
        generator: QuizGenerator::new(Arc::new(gemini)),
    };

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
