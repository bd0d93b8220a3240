// CRUD routes over MongoDB. These tests need a running server and are skipped
// unless MONGODB_URL is set, e.g. MONGODB_URL=mongodb://localhost:27017

use axum::Router;
use axum::http::StatusCode;
use doccrate::{CRUDResource, CrudRouter, DocumentStore, MongoStore, StoreConfig};
use serde_json::json;

mod common;
use common::{Widget, send};

/// Connects to a fresh, uniquely named database so parallel tests never
/// share a collection. `None` when no server is configured.
async fn mongo_store() -> Option<MongoStore> {
    let Ok(db_url) = std::env::var("MONGODB_URL") else {
        eprintln!("MONGODB_URL not set, skipping");
        return None;
    };
    let config = StoreConfig {
        db_url,
        database: format!("doccrate_test_{}", uuid::Uuid::new_v4().simple()),
        ..StoreConfig::default()
    };
    let store = MongoStore::connect(&config, Widget::COLLECTION_NAME)
        .await
        .expect("Failed to connect to MongoDB");
    store.delete_all().await.expect("Failed to clear collection");
    Some(store)
}

async fn mongo_app() -> Option<Router> {
    Some(CrudRouter::<Widget>::new(mongo_store().await?).into_router())
}

#[tokio::test]
async fn test_widget_lifecycle() {
    let Some(app) = mongo_app().await else { return };
    common::widget_lifecycle(&app).await;
}

#[tokio::test]
async fn test_unknown_identifiers_are_not_found() {
    let Some(app) = mongo_app().await else { return };
    common::unknown_identifiers_are_not_found(&app, "5f2b6c1e9d3a4b0012345678").await;
}

#[tokio::test]
async fn test_list_pages_in_store_order() {
    let Some(app) = mongo_app().await else { return };
    common::list_pages_in_store_order(&app).await;
}

#[tokio::test]
async fn test_partial_update() {
    let Some(app) = mongo_app().await else { return };
    common::partial_update_touches_only_supplied_fields(&app).await;
}

#[tokio::test]
async fn test_null_on_required_field_is_rejected() {
    let Some(app) = mongo_app().await else { return };
    common::null_on_required_field_is_rejected(&app).await;
}

#[tokio::test]
async fn test_delete_all() {
    let Some(app) = mongo_app().await else { return };
    common::delete_all_empties_the_collection(&app).await;
}

#[tokio::test]
async fn test_malformed_object_id_is_bad_request() {
    let Some(app) = mongo_app().await else { return };
    for method in ["GET", "PUT", "DELETE"] {
        let body = (method == "PUT").then(|| json!({"name": "x"}));
        let (status, response) = send(&app, method, "/widgets/not-an-object-id", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert!(
            response["error"]
                .as_str()
                .unwrap()
                .contains("not-an-object-id")
        );
    }
}

#[tokio::test]
async fn test_identifiers_are_object_id_hex() {
    let Some(app) = mongo_app().await else { return };
    let created = common::create_widget(&app, "/widgets", json!({"name": "widget"})).await;
    assert_eq!(created.id.len(), 24);
    assert!(doccrate::store::mongo::parse_object_id(&created.id).is_ok());
}

#[tokio::test]
async fn test_delete_all_returns_exactly_the_removed_documents() {
    let Some(store) = mongo_store().await else { return };
    let mut inserted = Vec::new();
    for name in ["a", "b"] {
        let mut document = doccrate::Document::new();
        document.insert("name".into(), json!(name));
        let created = store.insert_one(document).await.unwrap();
        inserted.push(created[doccrate::ID_FIELD].clone());
    }

    let removed = store.delete_all().await.unwrap();
    let removed_ids: Vec<_> = removed.iter().map(|d| d[doccrate::ID_FIELD].clone()).collect();
    assert_eq!(removed_ids, inserted);
    assert!(store.find_many(0, 10).await.unwrap().is_empty());
    assert!(store.delete_all().await.unwrap().is_empty());
}
