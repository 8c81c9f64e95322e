use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ClassificationResult, FeedbackSubmission};

/// A feedback record ready to be written: submission plus derived fields.
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    #[serde(flatten)]
    pub submission: FeedbackSubmission,
    #[serde(flatten)]
    pub classification: ClassificationResult,
}

impl NewFeedback {
    pub fn new(submission: FeedbackSubmission, classification: ClassificationResult) -> Self {
        Self {
            submission,
            classification,
        }
    }
}

/// Persisted feedback row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub feedback: String,
    pub rating: i32,
    pub sentiment: String,
    pub category: String,
    pub suggestion: String,
    pub developer_suggestion: String,
    pub spam_reason: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Feedback Queries
// =============================================================================

impl Feedback {
    /// Append one record. `created_at` comes from the database clock.
    pub async fn create(record: &NewFeedback, pool: &PgPool) -> Result<Self> {
        let NewFeedback {
            submission,
            classification,
        } = record;

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO feedback (
                first_name, last_name, email, feedback, rating,
                sentiment, category, suggestion, developer_suggestion, spam_reason
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&submission.first_name)
        .bind(&submission.last_name)
        .bind(&submission.email)
        .bind(&submission.feedback)
        .bind(submission.rating)
        .bind(classification.sentiment.as_str())
        .bind(classification.category.as_str())
        .bind(&classification.user_suggestion)
        .bind(&classification.developer_suggestion)
        .bind(&classification.spam_reason)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM feedback WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}
