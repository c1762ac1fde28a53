use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// User record as persisted. The credential hash rides along for internal
/// use; serde skips it here and handlers only ever serialize `PublicUser`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Insert payload. The store assigns id and both timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique-constraint violation on the email column.
    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence boundary for user records. Email uniqueness is enforced
/// behind this trait; callers translate `DuplicateEmail` instead of
/// pre-checking for the address.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Writes back a loaded record, refreshing `updated_at`. Returns `None`
    /// if the row vanished in the meantime.
    async fn update(&self, user: &User) -> Result<Option<User>, StoreError>;

    /// True if a record was removed, false if it was already absent.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
