//! Minimal document CRUD API with Axum
//!
//! ```bash
//! # MongoDB (default connection string mongodb://localhost)
//! cargo run --example minimal
//!
//! # No server needed
//! DOCCRATE_DB_URL=sqlite::memory: cargo run --example minimal
//! ```
//!
//! Then visit:
//! - **API**: <http://localhost:3000/todos>
//! - **Documentation**: <http://localhost:3000/docs>
//!
//! Deleting the whole collection needs `Authorization: Bearer admin`.

use std::sync::Arc;

use axum::http::request::Parts;
use doccrate::{
    ApiError, CrudRouter, DocumentStore, DocumentToModels, MongoStore, Operation, SqlStore,
    StoreConfig,
};
use serde::{Deserialize, Serialize};
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone, Debug, Serialize, Deserialize, DocumentToModels)]
#[doccrate(name_singular = "todo", description = "Simple todo management")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub due: Option<String>,
}

fn admin_only(parts: &Parts) -> Result<(), ApiError> {
    match parts.headers.get("authorization") {
        Some(value) if value == "Bearer admin" => Ok(()),
        _ => Err(ApiError::unauthorized("Admin token required")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,doccrate=debug".into()),
        )
        .compact()
        .init();

    let config = StoreConfig::from_env();
    let collection = config.collection_for::<Todo>();
    let store: Arc<dyn DocumentStore> = if config.db_url.starts_with("mongodb") {
        Arc::new(MongoStore::connect(&config, collection).await?)
    } else {
        Arc::new(SqlStore::connect(&config, collection).await?)
    };

    let todos = CrudRouter::<Todo>::with_store(store)
        .with_config(&config)
        .guard(Operation::DeleteAll, admin_only);
    let apidocs = todos.openapi();
    let app = todos
        .into_router::<()>()
        .merge(Scalar::with_url("/docs", apidocs));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("API: http://0.0.0.0:3000/todos, docs: http://0.0.0.0:3000/docs");
    axum::serve(listener, app).await?;
    Ok(())
}
