pub mod json_extract;
pub mod pipeline;
pub mod prompts;
pub mod stages;

pub use json_extract::{extract_json, extract_json_as, MalformedModelOutput};
pub use pipeline::{FeedbackPipeline, PipelineOutcome};
pub use stages::{FeedbackContext, FeedbackStage, StageFlow, StageName};
