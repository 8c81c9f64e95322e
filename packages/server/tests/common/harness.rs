//! Test harnesses.
//!
//! `RouterHarness` drives the axum router in-process with mocked AI and store.
//! `TestHarness` uses a shared Postgres testcontainer for store tests; the
//! container and migrations are initialized once on first use, then reused.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use feedback_core::kernel::test_dependencies::{MockAI, MockFeedbackStore, TestDependencies};
use feedback_core::server::build_app;
use serde_json::Value;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;

pub const FORM_ORIGIN: &str = "http://localhost:5173";

// =============================================================================
// Router harness (no external services)
// =============================================================================

pub struct RouterHarness {
    pub deps: TestDependencies,
    app: Router,
}

impl RouterHarness {
    pub fn new(ai: MockAI) -> Self {
        Self::with_store(ai, MockFeedbackStore::new())
    }

    pub fn with_store(ai: MockAI, store: MockFeedbackStore) -> Self {
        let deps = TestDependencies::new()
            .with_ai(ai)
            .with_feedback_store(store);
        let app = build_app(deps.server_deps(), &[FORM_ORIGIN.to_string()]);
        Self { deps, app }
    }

    /// Send a request and decode the JSON body (Null when empty or not JSON).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router should always produce a response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should be readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn analyze(&self, body: Value) -> (StatusCode, Value) {
        self.send(post_json("/analyze", &body.to_string())).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
    }

    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

// =============================================================================
// Postgres harness (requires Docker)
// =============================================================================

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Fresh pool per test over the shared, migrated database.
pub struct TestHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { db_pool })
    }
}
