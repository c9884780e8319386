//! Directory models

pub mod profile;

// Re-export for convenience
pub use profile::{ProfileRow, ProfileSummaryRow, UserProfile};
