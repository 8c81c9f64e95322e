//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod feedback_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, DEFAULT_LLM_MODEL};
pub use feedback_store::PostgresFeedbackStore;
pub use test_dependencies::TestDependencies;
pub use traits::*;
