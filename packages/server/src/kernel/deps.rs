//! Server dependencies for the feedback pipeline (using traits for testability)
//!
//! Built once at startup and shared by every request. Requests only read the
//! client handles; nothing per-request is stored here.

use std::sync::Arc;

use crate::kernel::{BaseAI, BaseFeedbackStore};

/// Default model served by the OpenAI-compatible host.
pub const DEFAULT_LLM_MODEL: &str = "llama3-8b-8192";

#[derive(Clone)]
pub struct ServerDeps {
    /// Chat completion client shared by all stages
    pub ai: Arc<dyn BaseAI>,
    pub feedback_store: Arc<dyn BaseFeedbackStore>,
    /// Model id sent with every stage's request
    pub llm_model: String,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        feedback_store: Arc<dyn BaseFeedbackStore>,
        llm_model: impl Into<String>,
    ) -> Self {
        Self {
            ai,
            feedback_store,
            llm_model: llm_model.into(),
        }
    }
}
