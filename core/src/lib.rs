//! # Warden Core
//!
//! In-memory credential lifecycle for the Warden auth core.
//! This crate contains domain entities, the generic expiring store, the token,
//! session, one-time token and rate limiting services, the janitor, and the
//! [`AuthManager`] that wires them together.

pub mod domain;
pub mod errors;
pub mod manager;
pub mod repositories;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use manager::{AuthManager, AuthStatus, StoreSizes, TtlSettings};
pub use repositories::*;
pub use services::*;
pub use store::{ExpiringStore, Lookup, Sweep, Take};
