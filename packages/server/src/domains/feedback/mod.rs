//! Feedback intake: validate, classify with the LLM stages, persist.

pub mod activities;
pub mod error;
pub mod models;

pub use activities::{FeedbackPipeline, PipelineOutcome, StageName};
pub use error::FeedbackError;
pub use models::{
    Category, ClassificationResult, Feedback, FeedbackSubmission, FeedbackSubmissionInput,
    NewFeedback, Sentiment, SpamVerdict, Suggestions,
};
