//! User repository trait: the user-record collaborator consumed by the core.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::UserRecord;
use crate::errors::DomainError;

/// Lookup and last-login bookkeeping for user records.
///
/// Implemented outside the core (database, directory service). The core only
/// reads `is_active`/`role` and reports successful refreshes.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use warden_core::repositories::UserRepository;
/// use warden_core::domain::entities::UserRecord;
/// use warden_core::errors::DomainError;
///
/// struct PgUserRepository {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for PgUserRepository {
///     async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError> {
///         Ok(None)
///     }
///
///     async fn touch_last_login(&self, id: Uuid) -> Result<(), DomainError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    ///
    /// # Returns
    /// * `Ok(Some(UserRecord))` - User found (may be inactive)
    /// * `Ok(None)` - No such user
    /// * `Err(DomainError)` - Backend failure
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError>;

    /// Record that the user just authenticated
    async fn touch_last_login(&self, id: Uuid) -> Result<(), DomainError>;
}
