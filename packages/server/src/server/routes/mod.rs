// HTTP routes
pub mod analyze;
pub mod health;
pub mod welcome;

pub use analyze::*;
pub use health::*;
pub use welcome::*;
