//! Feedback pipeline stages.
//!
//! Every stage shares one contract: read the submission and whatever earlier
//! stages produced from [`FeedbackContext`], add its own partial result, and
//! either continue or reject. Each model-backed stage makes exactly one call
//! and never retries.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message};
use serde::Deserialize;
use std::fmt;
use tracing::{info, warn};

use super::json_extract::{extract_json_as, MalformedModelOutput};
use super::prompts::{self, StagePrompt};
use crate::domains::feedback::models::{
    Category, ClassificationResult, Feedback, FeedbackSubmission, NewFeedback, Sentiment,
    SpamVerdict, Suggestions,
};
use crate::domains::feedback::FeedbackError;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageName {
    SpamCheck,
    SentimentAnalysis,
    CategoryClassification,
    SuggestionGeneration,
    Persist,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpamCheck => "spam check",
            Self::SentimentAnalysis => "sentiment analysis",
            Self::CategoryClassification => "category classification",
            Self::SuggestionGeneration => "suggestion generation",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State threaded through the stages of a single request.
#[derive(Debug, Clone)]
pub struct FeedbackContext {
    pub submission: FeedbackSubmission,
    pub spam: Option<SpamVerdict>,
    pub sentiment: Option<Sentiment>,
    pub category: Option<Category>,
    pub suggestions: Option<Suggestions>,
    pub stored: Option<Feedback>,
}

impl FeedbackContext {
    pub fn new(submission: FeedbackSubmission) -> Self {
        Self {
            submission,
            spam: None,
            sentiment: None,
            category: None,
            suggestions: None,
            stored: None,
        }
    }

    fn missing(stage: StageName) -> FeedbackError {
        FeedbackError::InvalidClassification {
            stage,
            detail: "result not available; stage has not run".to_string(),
        }
    }

    /// Assemble the final classification. Fails if any classifying stage
    /// has not produced its result yet.
    pub fn classification(&self) -> Result<ClassificationResult, FeedbackError> {
        let spam = self
            .spam
            .as_ref()
            .ok_or_else(|| Self::missing(StageName::SpamCheck))?;
        let sentiment = self
            .sentiment
            .ok_or_else(|| Self::missing(StageName::SentimentAnalysis))?;
        let category = self
            .category
            .ok_or_else(|| Self::missing(StageName::CategoryClassification))?;
        let suggestions = self
            .suggestions
            .as_ref()
            .ok_or_else(|| Self::missing(StageName::SuggestionGeneration))?;

        Ok(ClassificationResult {
            is_spam: spam.is_spam,
            spam_reason: spam.reason.clone(),
            sentiment,
            category,
            developer_suggestion: suggestions.developer_suggestion.clone(),
            user_suggestion: suggestions.user_suggestion.clone(),
        })
    }
}

/// What the pipeline does after a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageFlow {
    Continue,
    /// Stop here; the submission was classified as spam.
    Reject(SpamVerdict),
}

#[async_trait]
pub trait FeedbackStage: Send + Sync {
    fn name(&self) -> StageName;

    async fn run(
        &self,
        ctx: &mut FeedbackContext,
        deps: &ServerDeps,
    ) -> Result<StageFlow, FeedbackError>;
}

/// One model call for a stage. Returns the trimmed assistant text.
async fn call_model(
    stage: StageName,
    prompt: StagePrompt,
    deps: &ServerDeps,
) -> Result<String, FeedbackError> {
    let request = ChatRequest::new(deps.llm_model.as_str())
        .message(Message::system(prompt.system))
        .message(Message::user(prompt.user))
        .temperature(prompt.temperature)
        .max_tokens(prompt.max_tokens);

    deps.ai
        .chat(request)
        .await
        .map(|text| text.trim().to_string())
        .map_err(|source| FeedbackError::Upstream { stage, source })
}

// =============================================================================
// Spam check
// =============================================================================

pub struct SpamCheckStage;

#[async_trait]
impl FeedbackStage for SpamCheckStage {
    fn name(&self) -> StageName {
        StageName::SpamCheck
    }

    async fn run(
        &self,
        ctx: &mut FeedbackContext,
        deps: &ServerDeps,
    ) -> Result<StageFlow, FeedbackError> {
        let prompt = prompts::spam_prompt(&ctx.submission.feedback);
        let raw = call_model(self.name(), prompt, deps).await?;

        let verdict: SpamVerdict =
            extract_json_as(&raw).map_err(|source| FeedbackError::MalformedModelOutput {
                stage: self.name(),
                source,
            })?;

        info!(
            stage = %self.name(),
            is_spam = verdict.is_spam,
            reason = %verdict.reason,
            "Spam detection result"
        );

        if verdict.is_spam {
            return Ok(StageFlow::Reject(verdict));
        }
        ctx.spam = Some(verdict);
        Ok(StageFlow::Continue)
    }
}

// =============================================================================
// Sentiment
// =============================================================================

/// No degraded path: anything but the three labels is fatal.
pub struct SentimentStage;

#[async_trait]
impl FeedbackStage for SentimentStage {
    fn name(&self) -> StageName {
        StageName::SentimentAnalysis
    }

    async fn run(
        &self,
        ctx: &mut FeedbackContext,
        deps: &ServerDeps,
    ) -> Result<StageFlow, FeedbackError> {
        let prompt = prompts::sentiment_prompt(&ctx.submission.feedback);
        let raw = call_model(self.name(), prompt, deps).await?;

        let sentiment = Sentiment::parse(&raw).ok_or_else(|| FeedbackError::InvalidClassification {
            stage: self.name(),
            detail: format!("invalid sentiment response {raw:?}"),
        })?;

        info!(stage = %self.name(), %sentiment, "Sentiment analysed");
        ctx.sentiment = Some(sentiment);
        Ok(StageFlow::Continue)
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Deserialize)]
struct CategoryAnswer {
    #[serde(default)]
    category: Option<String>,
}

/// Never blocks the pipeline: unparseable or unknown labels become `Other`.
pub struct CategoryStage;

impl CategoryStage {
    fn resolve(&self, raw: &str) -> Category {
        let answer = match extract_json_as::<CategoryAnswer>(raw) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(
                    stage = %self.name(),
                    error = %e,
                    "Failed to parse category response, using Other"
                );
                return Category::Other;
            }
        };

        match answer.category.as_deref().map(Category::from_label) {
            Some(Some(category)) => category,
            Some(None) | None => {
                warn!(
                    stage = %self.name(),
                    label = ?answer.category,
                    "Category outside the closed set, using Other"
                );
                Category::Other
            }
        }
    }
}

#[async_trait]
impl FeedbackStage for CategoryStage {
    fn name(&self) -> StageName {
        StageName::CategoryClassification
    }

    async fn run(
        &self,
        ctx: &mut FeedbackContext,
        deps: &ServerDeps,
    ) -> Result<StageFlow, FeedbackError> {
        let prompt = prompts::category_prompt(&ctx.submission.feedback);
        let raw = call_model(self.name(), prompt, deps).await?;

        let category = self.resolve(&raw);
        info!(stage = %self.name(), %category, "Category classified");
        ctx.category = Some(category);
        Ok(StageFlow::Continue)
    }
}

// =============================================================================
// Suggestions
// =============================================================================

/// Unparseable output degrades to fixed messages; empty fields after that are fatal.
pub struct SuggestionStage;

#[async_trait]
impl FeedbackStage for SuggestionStage {
    fn name(&self) -> StageName {
        StageName::SuggestionGeneration
    }

    async fn run(
        &self,
        ctx: &mut FeedbackContext,
        deps: &ServerDeps,
    ) -> Result<StageFlow, FeedbackError> {
        let sentiment = ctx.sentiment.ok_or_else(|| FeedbackError::InvalidClassification {
            stage: self.name(),
            detail: "sentiment must be analysed before suggestions".to_string(),
        })?;

        let raw = call_model(
            self.name(),
            prompts::suggestion_prompt(&ctx.submission.feedback, sentiment),
            deps,
        )
        .await?;

        let suggestions = extract_json_as::<Suggestions>(&raw).unwrap_or_else(
            |e: MalformedModelOutput| {
                warn!(
                    stage = %self.name(),
                    raw = %e.preview(),
                    "Failed to parse suggestion response, using fallback"
                );
                Suggestions::fallback()
            },
        );

        if !suggestions.is_complete() {
            return Err(FeedbackError::InvalidClassification {
                stage: self.name(),
                detail: "Invalid suggestion format from LLM".to_string(),
            });
        }

        info!(stage = %self.name(), "Suggestions generated");
        ctx.suggestions = Some(suggestions);
        Ok(StageFlow::Continue)
    }
}

// =============================================================================
// Persist
// =============================================================================

/// Exactly one write, no retry, no read-back.
pub struct PersistStage;

#[async_trait]
impl FeedbackStage for PersistStage {
    fn name(&self) -> StageName {
        StageName::Persist
    }

    async fn run(
        &self,
        ctx: &mut FeedbackContext,
        deps: &ServerDeps,
    ) -> Result<StageFlow, FeedbackError> {
        let record = NewFeedback::new(ctx.submission.clone(), ctx.classification()?);

        let stored = deps
            .feedback_store
            .append(&record)
            .await
            .map_err(FeedbackError::Persistence)?;

        info!(stage = %self.name(), feedback_id = %stored.id, "Feedback persisted");
        ctx.stored = Some(stored);
        Ok(StageFlow::Continue)
    }
}
