//! Audit module for recording security events and user activity.

mod service;

pub use service::{ActivityTracker, SecurityEventLog};
