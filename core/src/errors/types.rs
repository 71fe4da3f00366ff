//! Domain-specific error types for token and authentication operations
//!
//! Messages here are for logs and operators. Callers that face end users should
//! use [`super::DomainError::public_message`] instead.

use thiserror::Error;

use crate::domain::entities::token::TokenKind;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Wrong token kind: expected {expected}, got {actual}")]
    KindMismatch { expected: TokenKind, actual: TokenKind },

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Token not found")]
    TokenNotFound,

    #[error("Presented token does not match the stored record")]
    TokenMismatch,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found or inactive")]
    UserInactive,

    #[error("Session not found or expired")]
    SessionNotFound,
}
