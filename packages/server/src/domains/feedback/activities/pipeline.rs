//! Feedback classification pipeline.
//!
//! Standard order: spam check → sentiment → category → suggestions → persist.
//! Stages run strictly one after another; the first rejection or error ends
//! the run. Nothing from one run is visible to another.

use tracing::{debug, info};

use super::stages::{
    CategoryStage, FeedbackContext, FeedbackStage, PersistStage, SentimentStage, SpamCheckStage,
    StageFlow, StageName, SuggestionStage,
};
use crate::domains::feedback::models::{
    ClassificationResult, Feedback, FeedbackSubmission, SpamVerdict,
};
use crate::domains::feedback::FeedbackError;
use crate::kernel::ServerDeps;

/// Terminal state of a pipeline run.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Completed {
        classification: ClassificationResult,
        record: Feedback,
    },
    /// Classified as spam; nothing was stored.
    Rejected(SpamVerdict),
}

pub struct FeedbackPipeline {
    stages: Vec<Box<dyn FeedbackStage>>,
}

impl FeedbackPipeline {
    pub fn new(stages: Vec<Box<dyn FeedbackStage>>) -> Self {
        Self { stages }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(SpamCheckStage),
            Box::new(SentimentStage),
            Box::new(CategoryStage),
            Box::new(SuggestionStage),
            Box::new(PersistStage),
        ])
    }

    pub fn stage_names(&self) -> Vec<StageName> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub async fn run(
        &self,
        submission: FeedbackSubmission,
        deps: &ServerDeps,
    ) -> Result<PipelineOutcome, FeedbackError> {
        let mut ctx = FeedbackContext::new(submission);

        for stage in &self.stages {
            debug!(stage = %stage.name(), "Running feedback stage");

            // Fatal errors are logged once, by the caller
            if let StageFlow::Reject(verdict) = stage.run(&mut ctx, deps).await? {
                info!(stage = %stage.name(), reason = %verdict.reason, "Feedback rejected as spam");
                return Ok(PipelineOutcome::Rejected(verdict));
            }
        }

        let classification = ctx.classification()?;
        let record = ctx.stored.ok_or_else(|| FeedbackError::InvalidClassification {
            stage: StageName::Persist,
            detail: "pipeline finished without storing the record".to_string(),
        })?;

        Ok(PipelineOutcome::Completed {
            classification,
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::feedback::models::{Category, Sentiment, Suggestions};
    use crate::kernel::test_dependencies::{MockAI, MockFeedbackStore, TestDependencies};

    const NOT_SPAM: &str = r#"{"isSpam": false, "reason": "Genuine product feedback"}"#;
    const SUGGESTIONS: &str = r#"{"developerSuggestion": "Investigate the settings screen crash", "suggestion": "Sorry about the crashes, we're fixing them."}"#;

    fn submission(feedback: &str) -> FeedbackSubmission {
        FeedbackSubmission {
            first_name: "Jo".into(),
            last_name: Some("Doe".into()),
            email: "jo@example.com".into(),
            feedback: feedback.into(),
            rating: 2,
        }
    }

    #[test]
    fn standard_order() {
        assert_eq!(
            FeedbackPipeline::standard().stage_names(),
            vec![
                StageName::SpamCheck,
                StageName::SentimentAnalysis,
                StageName::CategoryClassification,
                StageName::SuggestionGeneration,
                StageName::Persist,
            ]
        );
    }

    #[tokio::test]
    async fn completes_and_persists_once() {
        let test_deps = TestDependencies::new().with_ai(
            MockAI::new()
                .with_response(NOT_SPAM)
                .with_response("Negative")
                .with_response(r#"```json
{"category": "Bug"}
```"#)
                .with_response(SUGGESTIONS),
        );

        let outcome = FeedbackPipeline::standard()
            .run(
                submission("The app crashes every time I open settings"),
                &test_deps.server_deps(),
            )
            .await
            .unwrap();

        let PipelineOutcome::Completed {
            classification,
            record,
        } = outcome
        else {
            panic!("expected completion");
        };

        assert_eq!(classification.sentiment, Sentiment::Negative);
        assert_eq!(classification.category, Category::Bug);
        assert!(!classification.is_spam);
        assert_eq!(classification.spam_reason, "Genuine product feedback");
        assert_eq!(test_deps.ai.call_count(), 4);

        let records = test_deps.feedback_store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, record.id);
        assert_eq!(records[0].developer_suggestion, "Investigate the settings screen crash");
    }

    #[tokio::test]
    async fn every_call_uses_configured_model() {
        let test_deps = TestDependencies::new().with_ai(
            MockAI::new()
                .with_response(NOT_SPAM)
                .with_response("Positive")
                .with_response(r#"{"category": "UI"}"#)
                .with_response(SUGGESTIONS),
        );

        FeedbackPipeline::standard()
            .run(submission("Nice colours"), &test_deps.server_deps())
            .await
            .unwrap();

        assert!(test_deps
            .ai
            .calls()
            .iter()
            .all(|r| r.model == crate::kernel::DEFAULT_LLM_MODEL));
    }

    #[tokio::test]
    async fn spam_short_circuits() {
        let verdict = r#"{"isSpam": true, "reason": "Contains a phishing link"}"#;
        let test_deps = TestDependencies::new().with_ai(MockAI::new().with_response(verdict));

        let outcome = FeedbackPipeline::standard()
            .run(submission("click here http://x.y"), &test_deps.server_deps())
            .await
            .unwrap();

        match outcome {
            PipelineOutcome::Rejected(verdict) => {
                assert_eq!(verdict.reason, "Contains a phishing link")
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(test_deps.ai.call_count(), 1);
        assert_eq!(test_deps.feedback_store.record_count(), 0);
    }

    #[tokio::test]
    async fn invalid_sentiment_aborts_without_write() {
        let test_deps = TestDependencies::new().with_ai(
            MockAI::new()
                .with_response(NOT_SPAM)
                .with_response("Mixed"),
        );

        let err = FeedbackPipeline::standard()
            .run(submission("meh"), &test_deps.server_deps())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(StageName::SentimentAnalysis));
        assert_eq!(test_deps.ai.call_count(), 2);
        assert_eq!(test_deps.feedback_store.record_count(), 0);
    }

    #[tokio::test]
    async fn degraded_category_and_suggestions_still_complete() {
        let test_deps = TestDependencies::new().with_ai(
            MockAI::new()
                .with_response(NOT_SPAM)
                .with_response("Neutral")
                .with_response("It's probably about the UI")
                .with_response("no json here"),
        );

        let outcome = FeedbackPipeline::standard()
            .run(submission("It is fine I guess"), &test_deps.server_deps())
            .await
            .unwrap();

        let PipelineOutcome::Completed { classification, .. } = outcome else {
            panic!("expected completion");
        };
        assert_eq!(classification.category, Category::Other);
        assert_eq!(
            classification.developer_suggestion,
            Suggestions::FALLBACK_DEVELOPER
        );
        assert_eq!(classification.user_suggestion, Suggestions::FALLBACK_USER);
        assert_eq!(test_deps.feedback_store.record_count(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_mid_pipeline_aborts() {
        let test_deps = TestDependencies::new().with_ai(
            MockAI::new()
                .with_response(NOT_SPAM)
                .with_response("Positive")
                .with_error("503 Service Unavailable"),
        );

        let err = FeedbackPipeline::standard()
            .run(submission("Love it"), &test_deps.server_deps())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(StageName::CategoryClassification));
        assert_eq!(test_deps.ai.call_count(), 3);
        assert_eq!(test_deps.feedback_store.record_count(), 0);
    }

    #[tokio::test]
    async fn persistence_failure_is_fatal() {
        let test_deps = TestDependencies::new()
            .with_ai(
                MockAI::new()
                    .with_response(NOT_SPAM)
                    .with_response("Positive")
                    .with_response(r#"{"category": "Content"}"#)
                    .with_response(SUGGESTIONS),
            )
            .with_feedback_store(MockFeedbackStore::failing("connection refused"));

        let err = FeedbackPipeline::standard()
            .run(submission("Great articles"), &test_deps.server_deps())
            .await
            .unwrap_err();

        assert!(matches!(err, FeedbackError::Persistence(_)));
    }

    #[tokio::test]
    async fn reordered_stages_still_classify() {
        let test_deps = TestDependencies::new().with_ai(
            MockAI::new()
                .with_response(r#"{"category": "Feature Request"}"#)
                .with_response(NOT_SPAM)
                .with_response("Positive")
                .with_response(SUGGESTIONS),
        );
        let pipeline = FeedbackPipeline::new(vec![
            Box::new(CategoryStage),
            Box::new(SpamCheckStage),
            Box::new(SentimentStage),
            Box::new(SuggestionStage),
            Box::new(PersistStage),
        ]);

        let outcome = pipeline
            .run(submission("Please add dark mode"), &test_deps.server_deps())
            .await
            .unwrap();

        let PipelineOutcome::Completed { classification, .. } = outcome else {
            panic!("expected completion");
        };
        assert_eq!(classification.category, Category::FeatureRequest);
    }

    #[tokio::test]
    async fn pipeline_without_persist_is_an_error() {
        let test_deps = TestDependencies::new().with_ai(
            MockAI::new()
                .with_response(NOT_SPAM)
                .with_response("Positive")
                .with_response(r#"{"category": "UI"}"#)
                .with_response(SUGGESTIONS),
        );
        let pipeline = FeedbackPipeline::new(vec![
            Box::new(SpamCheckStage),
            Box::new(SentimentStage),
            Box::new(CategoryStage),
            Box::new(SuggestionStage),
        ]);

        let err = pipeline
            .run(submission("Nice"), &test_deps.server_deps())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(StageName::Persist));
    }
}
