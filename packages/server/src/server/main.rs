// Main entry point for the feedback API server

use std::sync::Arc;

use anyhow::{Context, Result};
use feedback_core::kernel::{PostgresFeedbackStore, ServerDeps};
use feedback_core::{server::build_app, Config};
use openai_client::OpenAIClient;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,feedback_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Feedback Sentiment Analysis API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        model = %config.llm_model,
        llm_base_url = %config.llm_base_url,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Build application
    let ai = OpenAIClient::new(config.llm_api_key.clone())
        .with_base_url(config.llm_base_url.clone());
    let server_deps = ServerDeps::new(
        Arc::new(ai),
        Arc::new(PostgresFeedbackStore::new(pool)),
        config.llm_model.clone(),
    );
    let app = build_app(server_deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Analyze endpoint: http://localhost:{}/analyze", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
