// CRUD routes over the Sea-ORM store on in-memory SQLite

use axum::Router;
use axum::http::StatusCode;
use doccrate::{CRUDResource, CrudRouter, DocumentStore, SqlStore, StoreConfig};
use sea_orm::{Database, DatabaseConnection};
use serde_json::json;

mod common;
use common::{Gadget, Widget, create_widget, send};

async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");
    SqlStore::ensure_schema(&db)
        .await
        .expect("Failed to create documents table");
    db
}

async fn sql_app() -> Router {
    let db = setup_db().await;
    CrudRouter::<Widget>::new(SqlStore::new(db, Widget::COLLECTION_NAME)).into_router()
}

#[tokio::test]
async fn test_widget_lifecycle() {
    common::widget_lifecycle(&sql_app().await).await;
}

#[tokio::test]
async fn test_unknown_identifiers_are_not_found() {
    common::unknown_identifiers_are_not_found(&sql_app().await, "00000000-0000-0000-0000-000000000000")
        .await;
}

#[tokio::test]
async fn test_list_pages_in_store_order() {
    common::list_pages_in_store_order(&sql_app().await).await;
}

#[tokio::test]
async fn test_partial_update() {
    common::partial_update_touches_only_supplied_fields(&sql_app().await).await;
}

#[tokio::test]
async fn test_delete_all() {
    common::delete_all_empties_the_collection(&sql_app().await).await;
}

#[tokio::test]
async fn test_null_on_required_field_is_rejected() {
    common::null_on_required_field_is_rejected(&sql_app().await).await;
}

#[tokio::test]
async fn test_collections_in_one_table_are_isolated() {
    let db = setup_db().await;
    let widgets: Router =
        CrudRouter::<Widget>::new(SqlStore::new(db.clone(), Widget::COLLECTION_NAME)).into_router();
    let gadgets: Router =
        CrudRouter::<Gadget>::new(SqlStore::new(db.clone(), Gadget::COLLECTION_NAME)).into_router();

    let widget = create_widget(&widgets, "/widgets", json!({"name": "widget"})).await;
    let (status, _) = send(&gadgets, "POST", "/gadgets", Some(json!({"label": "gadget"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    // A widget identifier means nothing to the gadget collection.
    let (status, _) = send(&gadgets, "GET", &format!("/gadgets/{}", widget.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&gadgets, "DELETE", &format!("/gadgets/{}", widget.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, removed) = send(&widgets, "DELETE", "/widgets", None).await;
    assert_eq!(removed.as_array().unwrap().len(), 1);

    let (_, remaining) = send(&gadgets, "GET", "/gadgets", None).await;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
    assert_eq!(remaining[0]["label"], "gadget");
}

#[tokio::test]
async fn test_store_round_trips_nested_values() {
    let db = setup_db().await;
    let store = SqlStore::new(db, "notes");
    let body = json!({"title": "note", "tags": ["a", "b"], "meta": {"pinned": true}});
    let serde_json::Value::Object(document) = body else {
        unreachable!()
    };

    let created = store.insert_one(document).await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    let fetched = store.find_one(&id).await.unwrap().unwrap();
    assert_eq!(fetched["tags"], json!(["a", "b"]));
    assert_eq!(fetched["meta"]["pinned"], true);
    assert_eq!(store.collection(), "notes");
}

#[tokio::test]
async fn test_connect_from_config() {
    let config = StoreConfig {
        db_url: "sqlite::memory:".to_string(),
        ..StoreConfig::default()
    };
    let store = SqlStore::connect(&config, config.collection_for::<Widget>())
        .await
        .unwrap();
    assert_eq!(store.collection(), "widgets");

    let app: Router = CrudRouter::<Widget>::new(store).into_router();
    create_widget(&app, "/widgets", json!({"name": "configured"})).await;
    let (_, all) = send(&app, "GET", "/widgets", None).await;
    assert_eq!(all[0]["name"], "configured");
}
