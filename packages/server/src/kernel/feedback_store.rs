// Postgres implementation of BaseFeedbackStore

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::BaseFeedbackStore;
use crate::domains::feedback::models::{Feedback, NewFeedback};

/// Append-only feedback store backed by the `feedback` table.
#[derive(Clone)]
pub struct PostgresFeedbackStore {
    pool: PgPool,
}

impl PostgresFeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseFeedbackStore for PostgresFeedbackStore {
    async fn append(&self, record: &NewFeedback) -> Result<Feedback> {
        let row = Feedback::create(record, &self.pool)
            .await
            .context("Failed to insert feedback record")?;

        tracing::debug!(feedback_id = %row.id, created_at = %row.created_at, "Feedback stored");
        Ok(row)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
