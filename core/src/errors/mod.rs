//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Fatal misconfiguration detected at construction time
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Collaborator (user repository) failure
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Coarse classification of every failure the core can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Expired,
    Malformed,
    KindMismatch,
    Revoked,
    NotFound,
    Mismatch,
    UserInactive,
    Internal,
}

impl DomainError {
    pub fn config(message: impl Into<String>) -> Self {
        DomainError::Config {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Map this error onto its [`ErrorKind`]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Config { .. } => ErrorKind::Config,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Internal { .. } => ErrorKind::Internal,
            DomainError::Auth(AuthError::UserInactive) => ErrorKind::UserInactive,
            DomainError::Auth(AuthError::SessionNotFound) => ErrorKind::NotFound,
            DomainError::Token(err) => match err {
                TokenError::TokenExpired => ErrorKind::Expired,
                TokenError::InvalidTokenFormat => ErrorKind::Malformed,
                TokenError::KindMismatch { .. } => ErrorKind::KindMismatch,
                TokenError::TokenRevoked => ErrorKind::Revoked,
                TokenError::TokenNotFound => ErrorKind::NotFound,
                TokenError::TokenMismatch => ErrorKind::Mismatch,
                TokenError::TokenGenerationFailed => ErrorKind::Internal,
            },
        }
    }

    /// Message safe to show to an end user.
    ///
    /// Every token failure collapses to the same text so a caller cannot probe
    /// which check rejected a token.
    pub fn public_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Expired
            | ErrorKind::Malformed
            | ErrorKind::KindMismatch
            | ErrorKind::Revoked
            | ErrorKind::NotFound
            | ErrorKind::Mismatch => "Invalid or expired token",
            ErrorKind::UserInactive => "Authentication failed",
            ErrorKind::Config | ErrorKind::Internal => "Internal server error",
        }
    }
}
