// Feedback Sentiment Analysis - API Core
//
// Accepts user feedback over HTTP, classifies it with a hosted LLM
// (spam, sentiment, category, suggestions) and stores the result.
//
// Pipeline stages live in domains/feedback/activities.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
