//! Single-use password reset and email verification tokens
//!
//! Both issuers hand out random opaque strings; the store is the only source
//! of truth. A consumed token is deleted, so reuse reports "not found".

mod email_verification;
mod password_reset;

pub use email_verification::EmailVerificationService;
pub use password_reset::PasswordResetService;

use crate::errors::{DomainError, TokenError};
use crate::store::Take;

/// Map a failed take onto the caller-facing error
fn take_error<V>(outcome: &Take<V>) -> DomainError {
    match outcome {
        Take::Expired => TokenError::TokenExpired.into(),
        _ => TokenError::TokenNotFound.into(),
    }
}

#[cfg(test)]
mod tests;
