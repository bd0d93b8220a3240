use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError, new_uuid_id};
use crate::core::document::{self, Document, ID_FIELD};

/// Collection kept in process memory, in insertion order.
///
/// Identifiers are random UUID strings and are accepted as-is on lookup.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn position(documents: &[Document], id: &str) -> Option<usize> {
    documents
        .iter()
        .position(|doc| document::document_id(doc) == Some(id))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn find_many(&self, skip: u64, limit: u64) -> Result<Vec<Document>, StoreError> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let documents = self.documents.read().await;
        Ok(documents.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn find_one(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(position(&documents, id).map(|index| documents[index].clone()))
    }

    async fn insert_one(&self, mut document: Document) -> Result<Document, StoreError> {
        document::strip_identifiers(&mut document);
        document.insert(ID_FIELD.to_string(), Value::String(new_uuid_id()));
        self.documents.write().await.push(document.clone());
        tracing::debug!(collection = %self.collection, "inserted document");
        Ok(document)
    }

    async fn update_one(
        &self,
        id: &str,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut documents = self.documents.write().await;
        let Some(index) = position(&documents, id) else {
            return Ok(None);
        };
        let current = std::mem::take(&mut documents[index]);
        documents[index] = document::merge(current, changes);
        Ok(Some(documents[index].clone()))
    }

    async fn delete_one(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let mut documents = self.documents.write().await;
        Ok(position(&documents, id).map(|index| documents.remove(index)))
    }

    async fn delete_all(&self) -> Result<Vec<Document>, StoreError> {
        let removed = std::mem::take(&mut *self.documents.write().await);
        tracing::debug!(collection = %self.collection, count = removed.len(), "deleted all documents");
        Ok(removed)
    }
}
