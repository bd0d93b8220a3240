use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Bson, doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::ReturnDocument,
};
use serde_json::Value;

use super::{DocumentStore, StoreError};
use crate::config::StoreConfig;
use crate::core::document::{self, Document, ID_FIELD, MONGO_ID_FIELD};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Collection accessed through the official MongoDB driver.
///
/// Documents are keyed by `ObjectId`. The API exposes the identifier as its
/// 24-character hex string under `id`; a string that is not a valid encoding
/// fails with [`StoreError::InvalidId`] before any query is sent.
#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<bson::Document>,
}

impl MongoStore {
    /// Connects a new client to `config.db_url` and binds `collection` in
    /// `config.database`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the connection string is invalid.
    pub async fn connect(config: &StoreConfig, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.db_url).await?;
        tracing::info!(database = %config.database, collection, "connected mongodb store");
        Ok(Self::from_client(&client, &config.database, collection))
    }

    /// Reuses an existing client. The client is cheap to clone and pooled.
    #[must_use]
    pub fn from_client(client: &Client, database: &str, collection: &str) -> Self {
        Self::from_database(&client.database(database), collection)
    }

    #[must_use]
    pub fn from_database(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }
}

/// Decodes a hex identifier into an `ObjectId`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidId`] for anything that is not 24 hex characters.
pub fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|err| StoreError::InvalidId {
        id: id.to_string(),
        reason: err.to_string(),
    })
}

fn into_bson(mut document: Document) -> Result<bson::Document, StoreError> {
    document::strip_identifiers(&mut document);
    Ok(bson::to_document(&document)?)
}

fn from_bson(mut raw: bson::Document) -> Document {
    let id = match raw.remove(MONGO_ID_FIELD) {
        Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
        Some(Bson::String(id)) => Some(id),
        Some(other) => Some(other.to_string()),
        None => None,
    };
    let mut document = match Bson::Document(raw).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    };
    if let Some(id) = id {
        document.insert(ID_FIELD.to_string(), Value::String(id));
    }
    document
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn collection(&self) -> &str {
        self.collection.name()
    }

    async fn find_many(&self, skip: u64, limit: u64) -> Result<Vec<Document>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let documents: Vec<bson::Document> = self
            .collection
            .find(doc! {})
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(documents.into_iter().map(from_bson).collect())
    }

    async fn find_one(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let oid = parse_object_id(id)?;
        let found = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(from_bson))
    }

    async fn insert_one(&self, document: Document) -> Result<Document, StoreError> {
        let mut raw = into_bson(document)?;
        let oid = ObjectId::new();
        raw.insert(MONGO_ID_FIELD, oid);
        self.collection.insert_one(&raw).await.map_err(|err| {
            if is_duplicate_key(&err) {
                StoreError::DuplicateKey(err.to_string())
            } else {
                StoreError::Mongo(err)
            }
        })?;
        tracing::debug!(collection = %self.collection.name(), id = %oid, "inserted document");
        Ok(from_bson(raw))
    }

    async fn update_one(
        &self,
        id: &str,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        let oid = parse_object_id(id)?;
        let changes = into_bson(changes)?;
        // `$set` rejects an empty document.
        if changes.is_empty() {
            let found = self.collection.find_one(doc! { "_id": oid }).await?;
            return Ok(found.map(from_bson));
        }
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": changes })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    StoreError::DuplicateKey(err.to_string())
                } else {
                    StoreError::Mongo(err)
                }
            })?;
        Ok(updated.map(from_bson))
    }

    async fn delete_one(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let oid = parse_object_id(id)?;
        let removed = self
            .collection
            .find_one_and_delete(doc! { "_id": oid })
            .await?;
        Ok(removed.map(from_bson))
    }

    async fn delete_all(&self) -> Result<Vec<Document>, StoreError> {
        let documents: Vec<bson::Document> =
            self.collection.find(doc! {}).await?.try_collect().await?;
        // Only what was read: documents inserted in between stay.
        let ids: Vec<Bson> = documents
            .iter()
            .filter_map(|document| document.get(MONGO_ID_FIELD).cloned())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = self
            .collection
            .delete_many(doc! { "_id": { "$in": ids } })
            .await?;
        tracing::debug!(
            collection = %self.collection.name(),
            deleted = result.deleted_count,
            "deleted all documents"
        );
        Ok(documents.into_iter().map(from_bson).collect())
    }
}
