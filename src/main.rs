use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizcast::{broadcast, config::ServerConfig, questions::QuestionBank, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizcast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting quizcast...");

    let config = ServerConfig::from_env();

    // A broadcast server with no valid questions has nothing to do
    let questions = match QuestionBank::load(config.questions_path.as_deref()) {
        Ok(bank) => {
            tracing::info!("Loaded {} questions", bank.len());
            bank
        }
        Err(e) => {
            tracing::error!("Failed to load question bank: {}", e);
            std::process::exit(1);
        }
    };

    let addr = config.socket_addr();
    let state = Arc::new(AppState::new(questions, config));

    // Spawn the perpetual question cycle once, before accepting connections
    broadcast::spawn_question_cycle(state.clone());

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Listening on ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
