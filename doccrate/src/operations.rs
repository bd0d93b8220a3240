//! # CRUD Operations Trait
//!
//! [`CRUDOperations`] is the typed layer between the HTTP handlers and a
//! [`DocumentStore`]. Each of the six operations has a default implementation;
//! override only the ones that need custom behavior and hand the
//! implementation to [`CrudRouter::operations`](crate::CrudRouter::operations).
//!
//! ```rust,ignore
//! use doccrate::{ApiError, CRUDOperations, DocumentStore};
//! use async_trait::async_trait;
//!
//! pub struct ArchiveOnDelete;
//!
//! #[async_trait]
//! impl CRUDOperations for ArchiveOnDelete {
//!     type Resource = Widget;
//!
//!     async fn delete(&self, store: &dyn DocumentStore, id: &str) -> Result<Widget, ApiError> {
//!         let widget = self.get_one(store, id).await?;
//!         archive(&widget).await?;
//!         // Default behavior for the actual removal
//!         doccrate::operations::delete_one(store, id).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;

use crate::core::{CRUDResource, Document, ID_FIELD};
use crate::errors::ApiError;
use crate::pagination::PageWindow;
use crate::store::DocumentStore;

fn not_found<T: CRUDResource>(id: &str) -> ApiError {
    ApiError::not_found(T::RESOURCE_NAME_SINGULAR, Some(id.to_string()))
}

fn into_records<T: CRUDResource>(
    documents: Vec<Document>,
) -> Result<Vec<T>, ApiError> {
    documents
        .into_iter()
        .map(|document| T::from_document(document).map_err(ApiError::from))
        .collect()
}

/// List up to `window.limit` records after `window.skip`, in store order.
/// An empty page is a valid result.
///
/// # Errors
///
/// Propagates store failures.
pub async fn list<T: CRUDResource>(
    store: &dyn DocumentStore,
    window: PageWindow,
) -> Result<Vec<T>, ApiError> {
    let documents = store.find_many(window.skip, window.limit).await?;
    into_records(documents)
}

/// # Errors
///
/// Returns [`ApiError::NotFound`] when no record has this identifier.
pub async fn get_one<T: CRUDResource>(store: &dyn DocumentStore, id: &str) -> Result<T, ApiError> {
    let document = store.find_one(id).await?.ok_or_else(|| not_found::<T>(id))?;
    Ok(T::from_document(document)?)
}

/// Placeholder identifier used to check a new document before it is stored.
const UNASSIGNED_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Fails unless `document` reads back as a `T` once an identifier is added.
fn check_complete<T: CRUDResource>(document: &Document) -> Result<(), ApiError> {
    let mut candidate = document.clone();
    candidate.insert(ID_FIELD.to_string(), Value::String(UNASSIGNED_ID.to_string()));
    T::from_document(candidate).map(drop).map_err(|err| {
        ApiError::custom(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Cannot create {}", T::RESOURCE_NAME_SINGULAR),
            Some(err.to_string()),
        )
    })
}

/// Nothing is written unless the new document forms a complete record.
///
/// # Errors
///
/// Propagates serialization and store failures. Never not-found.
pub async fn create<T: CRUDResource>(
    store: &dyn DocumentStore,
    data: &T::CreateModel,
) -> Result<T, ApiError> {
    let document = T::create_document(data)?;
    check_complete::<T>(&document)?;
    let created = store.insert_one(document).await?;
    Ok(T::from_document(created)?)
}

/// Re-fetches the record, then applies only the supplied fields.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the record does not exist before the
/// write, or is gone by the time the write lands.
pub async fn update<T: CRUDResource>(
    store: &dyn DocumentStore,
    id: &str,
    data: &T::UpdateModel,
) -> Result<T, ApiError> {
    if store.find_one(id).await?.is_none() {
        return Err(not_found::<T>(id));
    }
    let changes = T::update_changes(data)?;
    let updated = store
        .update_one(id, changes)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    Ok(T::from_document(updated)?)
}

/// Re-fetches the record, then removes it and returns what was removed.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the record does not exist.
pub async fn delete_one<T: CRUDResource>(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<T, ApiError> {
    if store.find_one(id).await?.is_none() {
        return Err(not_found::<T>(id));
    }
    let removed = store
        .delete_one(id)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    Ok(T::from_document(removed)?)
}

/// # Errors
///
/// Propagates store failures.
pub async fn delete_all<T: CRUDResource>(store: &dyn DocumentStore) -> Result<Vec<T>, ApiError> {
    let removed = store.delete_all().await?;
    into_records(removed)
}

/// Trait for defining CRUD operations with customizable behavior
///
/// Every method has a default that calls the matching free function in this
/// module, so an implementation can wrap the default instead of rewriting it.
#[async_trait]
pub trait CRUDOperations: Send + Sync {
    /// The CRUD resource type this operations implementation works with
    type Resource: CRUDResource;

    async fn get_all(
        &self,
        store: &dyn DocumentStore,
        window: PageWindow,
    ) -> Result<Vec<Self::Resource>, ApiError> {
        list::<Self::Resource>(store, window).await
    }

    async fn get_one(
        &self,
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Self::Resource, ApiError> {
        get_one::<Self::Resource>(store, id).await
    }

    async fn create(
        &self,
        store: &dyn DocumentStore,
        data: <Self::Resource as CRUDResource>::CreateModel,
    ) -> Result<Self::Resource, ApiError> {
        create::<Self::Resource>(store, &data).await
    }

    async fn update(
        &self,
        store: &dyn DocumentStore,
        id: &str,
        data: <Self::Resource as CRUDResource>::UpdateModel,
    ) -> Result<Self::Resource, ApiError> {
        update::<Self::Resource>(store, id, &data).await
    }

    async fn delete(
        &self,
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Self::Resource, ApiError> {
        delete_one::<Self::Resource>(store, id).await
    }

    async fn delete_all(&self, store: &dyn DocumentStore) -> Result<Vec<Self::Resource>, ApiError> {
        delete_all::<Self::Resource>(store).await
    }
}

/// Default CRUD operations implementation
///
/// Zero-sized; used by [`CrudRouter`](crate::CrudRouter) unless another
/// implementation is supplied.
pub struct DefaultCRUDOperations<T: CRUDResource> {
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T: CRUDResource> DefaultCRUDOperations<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: CRUDResource> Default for DefaultCRUDOperations<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: CRUDResource> CRUDOperations for DefaultCRUDOperations<T> {
    type Resource = T;
}
