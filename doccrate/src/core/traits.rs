use serde::{Serialize, de::DeserializeOwned};

use super::document::{self, Document};
use crate::store::StoreError;

/// A record type that can be served by a [`CrudRouter`](crate::CrudRouter).
///
/// The record itself is what the API returns; it must carry its identifier in
/// an `id` field serialized as a string. `CreateModel` and `UpdateModel` are
/// the write inputs. An `UpdateModel` must serialize only the fields the caller
/// supplied, which is what the `DocumentToModels` derive generates.
pub trait CRUDResource: Serialize + DeserializeOwned + Send + Sync + Sized + 'static {
    type CreateModel: Serialize + DeserializeOwned + Send + Sync + 'static;
    type UpdateModel: Serialize + DeserializeOwned + Send + Sync + 'static;

    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    /// Collection used when the store configuration does not name one.
    const COLLECTION_NAME: &'static str;
    const RESOURCE_DESCRIPTION: &'static str = "";

    /// Converts a stored document into the API record.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the document does not match the schema.
    fn from_document(document: Document) -> Result<Self, StoreError> {
        document::from_document(document)
    }

    /// Builds the document to insert for a create request.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the input does not serialize to an object.
    fn create_document(data: &Self::CreateModel) -> Result<Document, StoreError> {
        document::write_document(data)
    }

    /// Builds the change set for an update request: only supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the input does not serialize to an object.
    fn update_changes(data: &Self::UpdateModel) -> Result<Document, StoreError> {
        document::write_document(data)
    }
}
