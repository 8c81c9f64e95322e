use serde::{Deserialize, Serialize};

use crate::domains::feedback::FeedbackError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Raw `/analyze` body as sent by the browser form. Every field is optional
/// here so that missing fields surface as a validation error instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmissionInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i64>,
}

/// A validated feedback submission. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub feedback: String,
    pub rating: i32,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl FeedbackSubmissionInput {
    pub fn validate(self) -> Result<FeedbackSubmission, FeedbackError> {
        let first_name = required(self.first_name);
        let email = required(self.email);
        let feedback = required(self.feedback);
        let rating = self.rating.filter(|r| *r != 0);

        let (Some(first_name), Some(email), Some(feedback), Some(rating)) =
            (first_name, email, feedback, rating)
        else {
            return Err(FeedbackError::Validation(
                "Missing required fields".to_string(),
            ));
        };

        let rating = i32::try_from(rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or_else(|| {
                FeedbackError::Validation(format!(
                    "rating must be between {MIN_RATING} and {MAX_RATING}"
                ))
            })?;

        Ok(FeedbackSubmission {
            first_name,
            last_name: required(self.last_name),
            email,
            feedback,
            rating,
        })
    }
}
