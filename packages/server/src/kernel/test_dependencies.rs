// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use openai_client::ChatRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{BaseAI, BaseFeedbackStore, ServerDeps, DEFAULT_LLM_MODEL};
use crate::domains::feedback::models::{Feedback, NewFeedback};

// =============================================================================
// Mock AI (scripted chat completions)
// =============================================================================

/// Replays queued responses in call order and records every request.
pub struct MockAI {
    responses: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
        self
    }

    /// Queue an upstream failure (network/API error)
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
        self
    }

    /// Get all requests that were sent to the AI
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the user prompt of the last request
    pub fn last_prompt(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .and_then(|r| r.last_user_content().map(str::to_string))
    }

    /// Check if a user prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.last_user_content().is_some_and(|p| p.contains(text)))
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn chat(&self, request: ChatRequest) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(request);

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("MockAI: no response queued")),
        }
    }
}

// =============================================================================
// Mock Feedback Store
// =============================================================================

/// In-memory store that stamps records the way the database would.
pub struct MockFeedbackStore {
    records: Arc<Mutex<Vec<Feedback>>>,
    fail_with: Option<String>,
}

impl MockFeedbackStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    /// Every append and ping fails with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(message.into()),
        }
    }

    /// Get all stored records
    pub fn records(&self) -> Vec<Feedback> {
        self.records.lock().unwrap().clone()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl Default for MockFeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseFeedbackStore for MockFeedbackStore {
    async fn append(&self, record: &NewFeedback) -> Result<Feedback> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow::anyhow!(message.clone()));
        }

        let NewFeedback {
            submission,
            classification,
        } = record;

        let row = Feedback {
            id: Uuid::new_v4(),
            first_name: submission.first_name.clone(),
            last_name: submission.last_name.clone(),
            email: submission.email.clone(),
            feedback: submission.feedback.clone(),
            rating: submission.rating,
            sentiment: classification.sentiment.to_string(),
            category: classification.category.to_string(),
            suggestion: classification.user_suggestion.clone(),
            developer_suggestion: classification.developer_suggestion.clone(),
            spam_reason: classification.spam_reason.clone(),
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn ping(&self) -> Result<()> {
        match &self.fail_with {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks with handles kept for assertions after the run.
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub feedback_store: Arc<MockFeedbackStore>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            feedback_store: Arc::new(MockFeedbackStore::new()),
        }
    }

    pub fn with_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn with_feedback_store(mut self, store: MockFeedbackStore) -> Self {
        self.feedback_store = Arc::new(store);
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.ai.clone(),
            self.feedback_store.clone(),
            DEFAULT_LLM_MODEL,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
