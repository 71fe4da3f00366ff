//! Domain entities representing core auth objects.

pub mod one_time_token;
pub mod rate_limit;
pub mod security_event;
pub mod session;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use one_time_token::{IssuedToken, OneTimePurpose, OneTimeToken};
pub use rate_limit::{RateLimitStatus, RateLimitWindow};
pub use security_event::{ActivityRecord, SecurityEvent, SecurityEventType};
pub use session::Session;
pub use token::{BlacklistEntry, Claims, RefreshTokenRecord, RevocationReason, TokenKind, TokenPair};
pub use user::UserRecord;
