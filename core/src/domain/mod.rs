//! Domain layer containing the auth core's entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
