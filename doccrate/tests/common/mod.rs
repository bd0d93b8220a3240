#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use doccrate::{CrudRouter, DocumentToModels, MemoryStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, DocumentToModels)]
#[doccrate(name_singular = "widget", description = "Things kept on the shelf")]
pub struct Widget {
    pub id: String,
    pub name: String,
    pub size: Option<i64>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, DocumentToModels)]
pub struct Gadget {
    pub id: String,
    pub label: String,
}

pub fn memory_app() -> Router {
    CrudRouter::<Widget>::new(MemoryStore::new("widgets")).into_router()
}

/// Sends one request and returns the status with the decoded JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn create_widget(app: &Router, prefix: &str, body: Value) -> Widget {
    let (status, created) = send(app, "POST", prefix, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
    serde_json::from_value(created).unwrap()
}

// Scenarios shared by every store. Each one expects an empty `/widgets`
// collection and an identifier that is well-formed for the store but unused.

pub async fn widget_lifecycle(app: &Router) {
    let created = create_widget(app, "/widgets", serde_json::json!({"name": "widget"})).await;
    assert_eq!(created.name, "widget");
    assert_eq!(created.size, None);
    assert!(!created.id.is_empty());

    let uri = format!("/widgets/{}", created.id);
    let (status, fetched) = send(app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_value::<Widget>(fetched).unwrap(), created);

    let (status, updated) = send(app, "PUT", &uri, Some(serde_json::json!({"name": "gadget"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "gadget");
    assert_eq!(updated["id"], created.id.as_str());

    let (status, fetched) = send(app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "gadget");

    let (status, removed) = send(app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["name"], "gadget");

    let (status, body) = send(app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        format!("widget with ID '{}' not found", created.id)
    );
}

pub async fn unknown_identifiers_are_not_found(app: &Router, unknown_id: &str) {
    let uri = format!("/widgets/{unknown_id}");
    let update = serde_json::json!({"name": "ghost"});
    for (method, body) in [("GET", None), ("PUT", Some(update)), ("DELETE", None)] {
        let (status, _) = send(app, method, &uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

pub async fn list_pages_in_store_order(app: &Router) {
    let (status, empty) = send(app, "GET", "/widgets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, serde_json::json!([]));

    for index in 0..5 {
        create_widget(app, "/widgets", serde_json::json!({"name": format!("w{index}"), "size": index})).await;
    }

    let (status, page) = send(app, "GET", "/widgets?skip=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = page.as_array().unwrap().iter().map(|w| w["name"].clone()).collect();
    assert_eq!(names, vec!["w1", "w2"]);

    let (_, tail) = send(app, "GET", "/widgets?skip=4&limit=10", None).await;
    assert_eq!(tail.as_array().unwrap().len(), 1);

    let (_, beyond) = send(app, "GET", "/widgets?skip=50", None).await;
    assert_eq!(beyond, serde_json::json!([]));

    let (_, all) = send(app, "GET", "/widgets", None).await;
    assert_eq!(all.as_array().unwrap().len(), 5);
}

pub async fn partial_update_touches_only_supplied_fields(app: &Router) {
    let created = create_widget(
        app,
        "/widgets",
        serde_json::json!({"name": "widget", "size": 3, "color": "red"}),
    )
    .await;
    let uri = format!("/widgets/{}", created.id);

    let (status, updated) = send(app, "PUT", &uri, Some(serde_json::json!({"size": 4}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["size"], 4);
    assert_eq!(updated["name"], "widget");
    assert_eq!(updated["color"], "red");

    // Explicit null clears a nullable field.
    let (_, cleared) = send(app, "PUT", &uri, Some(serde_json::json!({"color": null}))).await;
    assert_eq!(cleared["color"], Value::Null);
    assert_eq!(cleared["size"], 4);

    // An empty body changes nothing.
    let (status, unchanged) = send(app, "PUT", &uri, Some(serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, cleared);

    // The identifier cannot be rewritten.
    let (_, same_id) = send(app, "PUT", &uri, Some(serde_json::json!({"id": "other", "name": "renamed"}))).await;
    assert_eq!(same_id["id"], created.id.as_str());
    assert_eq!(same_id["name"], "renamed");
}

pub async fn delete_all_empties_the_collection(app: &Router) {
    for name in ["a", "b", "c"] {
        create_widget(app, "/widgets", serde_json::json!({"name": name})).await;
    }

    let (status, removed) = send(app, "DELETE", "/widgets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed.as_array().unwrap().len(), 3);

    let (status, after) = send(app, "GET", "/widgets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, serde_json::json!([]));

    let (status, removed_again) = send(app, "DELETE", "/widgets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed_again, serde_json::json!([]));
}

pub async fn null_on_required_field_is_rejected(app: &Router) {
    let created = create_widget(app, "/widgets", serde_json::json!({"name": "widget", "size": 2})).await;
    let uri = format!("/widgets/{}", created.id);

    let (status, _) = send(app, "PUT", &uri, Some(serde_json::json!({"name": null}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, fetched) = send(app, "GET", &uri, None).await;
    assert_eq!(serde_json::from_value::<Widget>(fetched).unwrap(), created);
}
