//! # Backing stores
//!
//! Every collection router talks to its collection through [`DocumentStore`],
//! which exposes the six CRUD operations over untyped [`Document`]s. One
//! implementation exists per backing client:
//!
//! - [`MemoryStore`]: in-process collection, UUID identifiers. Useful for tests
//!   and prototyping.
//! - [`MongoStore`] (`mongodb` feature): the official driver on a raw
//!   collection, `ObjectId` identifiers.
//! - [`SqlStore`] (`sqlite`, `postgresql` or `mysql` feature): Sea-ORM, one
//!   JSON document per row, UUID identifiers.
//!
//! Stores never translate absence into an error; they return `None` and leave
//! the not-found decision to [`CRUDOperations`](crate::CRUDOperations).

use async_trait::async_trait;

use crate::core::Document;

pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
#[cfg(feature = "sql")]
pub mod sql;

pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;
#[cfg(feature = "sql")]
pub use sql::SqlStore;

/// Errors raised by a backing store. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identifier cannot be decoded into the store's native key type.
    #[error("invalid identifier '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    /// A write input or stored value did not serialize to a JSON object.
    #[error("document must be a JSON object")]
    NotAnObject,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A unique index rejected the write.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[cfg(feature = "mongodb")]
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[cfg(feature = "mongodb")]
    #[error("bson encoding error: {0}")]
    BsonEncode(#[from] mongodb::bson::ser::Error),

    #[cfg(feature = "sql")]
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Access to one collection of documents.
///
/// Implementations are shared by all in-flight requests and must not hold
/// per-request state.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the collection this store is bound to.
    fn collection(&self) -> &str;

    /// Up to `limit` documents after the first `skip`, in store order.
    async fn find_many(&self, skip: u64, limit: u64) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Persists a new document and returns it with its assigned `id`.
    async fn insert_one(&self, document: Document) -> Result<Document, StoreError>;

    /// Applies `changes` as a shallow merge and returns the document after the
    /// write, or `None` if nothing matched.
    async fn update_one(&self, id: &str, changes: Document)
    -> Result<Option<Document>, StoreError>;

    /// Removes one document and returns it, or `None` if nothing matched.
    async fn delete_one(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Removes every document in the collection and returns them.
    async fn delete_all(&self) -> Result<Vec<Document>, StoreError>;
}

pub(crate) fn new_uuid_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
