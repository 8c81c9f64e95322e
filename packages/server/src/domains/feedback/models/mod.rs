pub mod classification;
pub mod feedback;
pub mod submission;

pub use classification::*;
pub use feedback::*;
pub use submission::*;
