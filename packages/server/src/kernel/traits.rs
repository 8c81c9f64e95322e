// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for and how to read the answer lives in domains/feedback.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseFeedbackStore)

use anyhow::Result;
use async_trait::async_trait;
use openai_client::ChatRequest;

use crate::domains::feedback::models::{Feedback, NewFeedback};

// =============================================================================
// AI Trait (Infrastructure - chat completion)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Run one chat completion and return the assistant's raw text.
    async fn chat(&self, request: ChatRequest) -> Result<String>;
}

// =============================================================================
// Feedback Store Trait (Infrastructure - append-only persistence)
// =============================================================================

#[async_trait]
pub trait BaseFeedbackStore: Send + Sync {
    /// Append one record. The store assigns the id and creation timestamp.
    async fn append(&self, record: &NewFeedback) -> Result<Feedback>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<()>;
}
