//! Business services containing the credential lifecycle logic.

pub mod audit;
pub mod janitor;
mod lifetime;
pub mod one_time;
pub mod rate_limit;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use audit::{ActivityTracker, SecurityEventLog};
pub use janitor::{Janitor, JanitorHandle, JanitorReport};
pub use lifetime::MAX_LIFETIME_SECONDS;
pub(crate) use lifetime::lifetime_from_seconds;
pub use one_time::{EmailVerificationService, PasswordResetService};
pub use rate_limit::RateLimiter;
pub use session::SessionService;
pub use token::{
    RefreshOutcome, SigningEngine, TokenService, TokenServiceConfig, TokenStoreSizes,
    UserTokenIndex,
};
