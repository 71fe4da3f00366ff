//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access/refresh token signing and verification
//! - Refresh token persistence and the per-user token index
//! - Rotation on refresh and revocation with a blacklist

mod config;
mod index;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use index::UserTokenIndex;
pub use service::{RefreshOutcome, TokenService, TokenStoreSizes};
pub use signer::SigningEngine;
