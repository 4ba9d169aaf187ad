//! Store interfaces for credentials and documents, with an in-memory implementation.
//!
//! Handlers only see these traits; PostgreSQL lives in [`crate::db`].

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Collection, Document, DocumentId, Fields, NewUser, UserRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("Duplicate key")]
    Duplicate,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store: user records keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Insert a new user. Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord>;
}

/// Document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    async fn find_one(&self, collection: Collection, id: DocumentId)
        -> StoreResult<Option<Document>>;

    async fn insert(&self, collection: Collection, fields: Fields) -> StoreResult<Document>;

    /// Overwrite the given fields. Returns the number of documents actually
    /// modified: 0 when the id is absent or every value was already equal.
    async fn set_fields(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    ) -> StoreResult<u64>;

    /// Returns the number of deleted documents.
    async fn delete(&self, collection: Collection, id: DocumentId) -> StoreResult<u64>;
}
