//! Prompt templates for the feedback classification stages.
//!
//! Feedback text is interpolated verbatim. It is not escaped, so quotes or
//! instructions inside the feedback reach the model as-is.

use crate::domains::feedback::models::{Category, Sentiment};

/// Everything needed for one model call.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePrompt {
    pub system: &'static str,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

// =============================================================================
// Spam
// =============================================================================

const SPAM_SYSTEM: &str =
    "You are a moderation assistant. Return ONLY a valid JSON object as instructed.";

pub fn spam_prompt(feedback: &str) -> StagePrompt {
    StagePrompt {
        system: SPAM_SYSTEM,
        user: format!(
            r#"
Classify the following user feedback as spam or not. Respond ONLY in JSON like this:

{{
  "isSpam": true or false,
  "reason": "brief reason"
}}

Feedback: "{feedback}"
"#
        ),
        temperature: 0.2,
        max_tokens: 100,
    }
}

// =============================================================================
// Sentiment
// =============================================================================

const SENTIMENT_SYSTEM: &str = "You are a sentiment analysis assistant. Respond with only one word: Positive, Negative, or Neutral.";

pub fn sentiment_prompt(feedback: &str) -> StagePrompt {
    StagePrompt {
        system: SENTIMENT_SYSTEM,
        user: format!(r#"Analyze the sentiment of this feedback: "{feedback}""#),
        temperature: 0.3,
        max_tokens: 10,
    }
}

// =============================================================================
// Category
// =============================================================================

const CATEGORY_SYSTEM: &str =
    "You are a classification assistant. Return ONLY a JSON object as instructed.";

pub fn category_prompt(feedback: &str) -> StagePrompt {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    StagePrompt {
        system: CATEGORY_SYSTEM,
        user: format!(
            r#"
Classify the following feedback into one of these categories:
{categories}

Return only a JSON like:
{{
  "category": "..."
}}

Feedback: "{feedback}"
"#
        ),
        temperature: 0.3,
        max_tokens: 30,
    }
}

// =============================================================================
// Suggestion
// =============================================================================

const SUGGESTION_SYSTEM: &str =
    "You are a JSON-only response bot. Only output valid JSON objects, no other text.";

pub fn suggestion_prompt(feedback: &str, sentiment: Sentiment) -> StagePrompt {
    StagePrompt {
        system: SUGGESTION_SYSTEM,
        user: format!(
            r#"
Analyze the following feedback and provide suggestions in JSON format:
Sentiment: {sentiment}
Feedback: "{feedback}"

Return ONLY a JSON object in this exact format (no other text):
{{
  "developerSuggestion": "Actionable suggestion for internal use, like what to fix or improve",
  "suggestion": "Polite and empathetic response for the user based on the sentiment and feedback and don't ask any further questions."
}}"#
        ),
        temperature: 0.5,
        max_tokens: 150,
    }
}
