use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, Database,
    DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Schema,
};
use serde_json::Value;

use super::{DocumentStore, StoreError, new_uuid_id};
use crate::config::StoreConfig;
use crate::core::document::{self, Document, ID_FIELD};

/// Row layout shared by every SQL-backed collection.
pub mod document_entity {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "doccrate_documents")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub seq: i32,
        pub collection: String,
        #[sea_orm(unique)]
        pub doc_id: String,
        #[sea_orm(column_type = "Json")]
        pub body: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

use document_entity::{ActiveModel, Column, Entity, Model};

/// Collection stored through Sea-ORM in a single `doccrate_documents` table.
///
/// Each row holds one document body as JSON, the collection it belongs to and
/// a UUID identifier. Store order is insertion order.
#[derive(Debug, Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
    collection: String,
}

impl SqlStore {
    /// Binds a collection on an existing connection. Call
    /// [`SqlStore::ensure_schema`] once before first use on a fresh database.
    #[must_use]
    pub fn new(db: DatabaseConnection, collection: impl Into<String>) -> Self {
        Self {
            db,
            collection: collection.into(),
        }
    }

    /// Connects to `config.db_url`, creates the documents table if needed and
    /// binds `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the connection or table creation fails.
    pub async fn connect(config: &StoreConfig, collection: &str) -> Result<Self, StoreError> {
        let db = Database::connect(&config.db_url).await?;
        Self::ensure_schema(&db).await?;
        tracing::info!(collection, "connected sql store");
        Ok(Self::new(db, collection))
    }

    /// Creates the documents table when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the statement fails.
    pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), StoreError> {
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);
        let mut statement = schema.create_table_from_entity(Entity);
        statement.if_not_exists();
        db.execute(backend.build(&statement)).await?;
        Ok(())
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn find_model(&self, id: &str) -> Result<Option<Model>, StoreError> {
        Ok(Entity::find()
            .filter(Column::Collection.eq(self.collection.as_str()))
            .filter(Column::DocId.eq(id))
            .one(&self.db)
            .await?)
    }
}

fn into_document(model: Model) -> Result<Document, StoreError> {
    let mut document = match model.body {
        Value::Object(map) => map,
        _ => return Err(StoreError::NotAnObject),
    };
    document.insert(ID_FIELD.to_string(), Value::String(model.doc_id));
    Ok(document)
}

#[async_trait]
impl DocumentStore for SqlStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn find_many(&self, skip: u64, limit: u64) -> Result<Vec<Document>, StoreError> {
        let models = Entity::find()
            .filter(Column::Collection.eq(self.collection.as_str()))
            .order_by_asc(Column::Seq)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;
        models.into_iter().map(into_document).collect()
    }

    async fn find_one(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.find_model(id).await?.map(into_document).transpose()
    }

    async fn insert_one(&self, mut document: Document) -> Result<Document, StoreError> {
        document::strip_identifiers(&mut document);
        let doc_id = new_uuid_id();
        let active_model = ActiveModel {
            seq: NotSet,
            collection: Set(self.collection.clone()),
            doc_id: Set(doc_id.clone()),
            body: Set(Value::Object(document)),
        };
        let model = active_model.insert(&self.db).await.map_err(|err| {
            match err.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                    StoreError::DuplicateKey(detail)
                }
                _ => StoreError::Database(err),
            }
        })?;
        tracing::debug!(collection = %self.collection, id = %doc_id, "inserted document");
        into_document(model)
    }

    async fn update_one(
        &self,
        id: &str,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };
        let current = match model.body.clone() {
            Value::Object(map) => map,
            _ => return Err(StoreError::NotAnObject),
        };
        let merged = document::merge(current, changes);
        let mut active_model: ActiveModel = model.into();
        active_model.body = Set(Value::Object(merged));
        let updated = active_model.update(&self.db).await?;
        into_document(updated).map(Some)
    }

    async fn delete_one(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };
        let result = Entity::delete_by_id(model.seq).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        into_document(model).map(Some)
    }

    async fn delete_all(&self) -> Result<Vec<Document>, StoreError> {
        let models = Entity::find()
            .filter(Column::Collection.eq(self.collection.as_str()))
            .order_by_asc(Column::Seq)
            .all(&self.db)
            .await?;
        let result = Entity::delete_many()
            .filter(Column::Collection.eq(self.collection.as_str()))
            .exec(&self.db)
            .await?;
        tracing::debug!(
            collection = %self.collection,
            deleted = result.rows_affected,
            "deleted all documents"
        );
        models.into_iter().map(into_document).collect()
    }
}
