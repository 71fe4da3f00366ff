//! Shared configuration and ambient utilities for the Warden auth core
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types (JWT, sessions, one-time tokens, rate limits, janitor)
//! - Environment detection
//! - Tracing subscriber initialisation

pub mod config;
pub mod telemetry;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuditConfig, AuthConfig, Environment, JanitorConfig, JwtConfig, LimitRule,
    LogFormat, LoggingConfig, OneTimeTokenConfig, RateLimitConfig, SessionConfig,
};
pub use telemetry::init_tracing;
