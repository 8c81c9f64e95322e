//! Feedback pipeline error taxonomy.
//!
//! A spam rejection is not an error: it is a terminal pipeline outcome
//! (see `PipelineOutcome::Rejected`).

use thiserror::Error;

use crate::domains::feedback::activities::json_extract::MalformedModelOutput;
use crate::domains::feedback::activities::stages::StageName;

#[derive(Debug, Error)]
pub enum FeedbackError {
    /// Missing or invalid caller input
    #[error("{0}")]
    Validation(String),

    /// No JSON could be recovered from a stage's model output
    #[error("{stage} failed: {source}")]
    MalformedModelOutput {
        stage: StageName,
        #[source]
        source: MalformedModelOutput,
    },

    /// Model answered, but with a value the pipeline cannot accept
    #[error("{stage} failed: {detail}")]
    InvalidClassification { stage: StageName, detail: String },

    /// Network or API error talking to the model
    #[error("{stage} call failed: {source:#}")]
    Upstream {
        stage: StageName,
        #[source]
        source: anyhow::Error,
    },

    /// Classification succeeded but the record could not be written
    #[error("classified but not saved: {0:#}")]
    Persistence(#[source] anyhow::Error),
}

impl FeedbackError {
    /// Pipeline stage the error originated from, when there is one.
    pub fn stage(&self) -> Option<StageName> {
        match self {
            Self::Validation(_) => None,
            Self::MalformedModelOutput { stage, .. }
            | Self::InvalidClassification { stage, .. }
            | Self::Upstream { stage, .. } => Some(*stage),
            Self::Persistence(_) => Some(StageName::Persist),
        }
    }
}
