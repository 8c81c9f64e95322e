//! POST /analyze
//!
//! Validates the form body, runs the feedback pipeline, and maps the outcome:
//! 200 classified and stored, 400 invalid input, 403 spam, 500 anything fatal.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domains::feedback::{
    Category, FeedbackError, FeedbackSubmissionInput, PipelineOutcome, Sentiment,
};
use crate::server::app::AxumAppState;

pub const SUCCESS_MESSAGE: &str = "Sentiment, category, and suggestions analyzed successfully";
pub const SPAM_MESSAGE: &str = "Your feedback was flagged as spam and was not recorded.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub message: String,
    pub sentiment: Sentiment,
    pub category: Category,
    /// User-facing reply
    pub suggestion: String,
    pub developer_suggestion: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamResponse {
    pub message: String,
    pub is_spam: bool,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: FeedbackError) -> Response {
    match err {
        FeedbackError::Validation(message) => {
            tracing::info!(error = %message, "Rejected invalid feedback submission");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
        }
        other => {
            tracing::error!(error = %other, stage = ?other.stage(), "Error analyzing feedback");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to process feedback: {other}"),
                }),
            )
                .into_response()
        }
    }
}

pub async fn analyze_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<FeedbackSubmissionInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            return error_response(FeedbackError::Validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    };

    let submission = match input.validate() {
        Ok(submission) => submission,
        Err(e) => return error_response(e),
    };

    tracing::info!(
        rating = submission.rating,
        feedback_length = submission.feedback.len(),
        "Received feedback"
    );

    match state.pipeline.run(submission, &state.server_deps).await {
        Ok(PipelineOutcome::Completed { classification, .. }) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                message: SUCCESS_MESSAGE.to_string(),
                sentiment: classification.sentiment,
                category: classification.category,
                suggestion: classification.user_suggestion,
                developer_suggestion: classification.developer_suggestion,
            }),
        )
            .into_response(),
        Ok(PipelineOutcome::Rejected(verdict)) => {
            tracing::warn!(reason = %verdict.reason, "Feedback flagged as spam");
            (
                StatusCode::FORBIDDEN,
                Json(SpamResponse {
                    message: SPAM_MESSAGE.to_string(),
                    is_spam: verdict.is_spam,
                    reason: verdict.reason,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
