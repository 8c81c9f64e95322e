use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sentiment label. The model must answer with exactly one of these words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }

    /// Strict parse of a model answer. Surrounding whitespace is ignored,
    /// anything else (case, punctuation, extra words) is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL.into_iter().find(|s| s.as_str() == trimmed)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of feedback categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "UI")]
    Ui,
    Performance,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    Bug,
    Content,
    #[serde(rename = "Product Design")]
    ProductDesign,
    #[serde(rename = "Customer Care")]
    CustomerCare,
    Update,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Ui,
        Self::Performance,
        Self::FeatureRequest,
        Self::Bug,
        Self::Content,
        Self::ProductDesign,
        Self::CustomerCare,
        Self::Update,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ui => "UI",
            Self::Performance => "Performance",
            Self::FeatureRequest => "Feature Request",
            Self::Bug => "Bug",
            Self::Content => "Content",
            Self::ProductDesign => "Product Design",
            Self::CustomerCare => "Customer Care",
            Self::Update => "Update",
            Self::Other => "Other",
        }
    }

    /// Match a label against the closed set, ignoring case and surrounding whitespace.
    pub fn from_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spam stage verdict as reported by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamVerdict {
    #[serde(rename = "isSpam", default, deserialize_with = "bool_or_string")]
    pub is_spam: bool,
    #[serde(default)]
    pub reason: String,
}

/// Models sometimes quote booleans (`"isSpam": "true"`).
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(value) => Ok(value),
        BoolOrString::Text(text) => match text.trim() {
            t if t.eq_ignore_ascii_case("true") => Ok(true),
            t if t.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"a boolean or \"true\"/\"false\"",
            )),
        },
    }
}

/// Developer-facing and user-facing suggestions produced by the last model stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(rename = "developerSuggestion", default)]
    pub developer_suggestion: String,
    /// User-facing reply
    #[serde(rename = "suggestion", default)]
    pub user_suggestion: String,
}

impl Suggestions {
    pub const FALLBACK_DEVELOPER: &'static str =
        "Review LLM response formatting - JSON parsing failed";
    pub const FALLBACK_USER: &'static str =
        "Thank you for your feedback. We will review it carefully.";

    pub fn fallback() -> Self {
        Self {
            developer_suggestion: Self::FALLBACK_DEVELOPER.to_string(),
            user_suggestion: Self::FALLBACK_USER.to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.developer_suggestion.trim().is_empty() && !self.user_suggestion.trim().is_empty()
    }
}

/// Everything the pipeline derived from one non-spam submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub is_spam: bool,
    pub spam_reason: String,
    pub sentiment: Sentiment,
    pub category: Category,
    pub developer_suggestion: String,
    pub user_suggestion: String,
}
