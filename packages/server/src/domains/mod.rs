// Business domains
pub mod feedback;
