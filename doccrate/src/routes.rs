use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::CRUDResource;
use crate::errors::ApiError;
use crate::operations::CRUDOperations;
use crate::pagination::Pagination;
use crate::store::DocumentStore;

/// Shared state behind every route of one collection router.
pub struct CrudState<T: CRUDResource> {
    pub store: Arc<dyn DocumentStore>,
    pub operations: Arc<dyn CRUDOperations<Resource = T>>,
    /// Router page size; caps and defaults `limit`.
    pub paginate: Option<u64>,
}

impl<T: CRUDResource> Clone for CrudState<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            operations: Arc::clone(&self.operations),
            paginate: self.paginate,
        }
    }
}

/// `GET {prefix}?skip&limit`
pub async fn get_all_handler<T: CRUDResource>(
    State(state): State<CrudState<T>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<T>>, ApiError> {
    let window = pagination.window(state.paginate)?;
    let items = state.operations.get_all(state.store.as_ref(), window).await?;
    Ok(Json(items))
}

/// `GET {prefix}/{item_id}`
pub async fn get_one_handler<T: CRUDResource>(
    State(state): State<CrudState<T>>,
    Path(item_id): Path<String>,
) -> Result<Json<T>, ApiError> {
    let item = state
        .operations
        .get_one(state.store.as_ref(), &item_id)
        .await?;
    Ok(Json(item))
}

/// `POST {prefix}`
pub async fn create_one_handler<T: CRUDResource>(
    State(state): State<CrudState<T>>,
    Json(payload): Json<T::CreateModel>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let created = state
        .operations
        .create(state.store.as_ref(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT {prefix}/{item_id}`
pub async fn update_one_handler<T: CRUDResource>(
    State(state): State<CrudState<T>>,
    Path(item_id): Path<String>,
    Json(payload): Json<T::UpdateModel>,
) -> Result<Json<T>, ApiError> {
    let updated = state
        .operations
        .update(state.store.as_ref(), &item_id, payload)
        .await?;
    Ok(Json(updated))
}

/// `DELETE {prefix}/{item_id}`, responds with the removed record.
pub async fn delete_one_handler<T: CRUDResource>(
    State(state): State<CrudState<T>>,
    Path(item_id): Path<String>,
) -> Result<Json<T>, ApiError> {
    let removed = state
        .operations
        .delete(state.store.as_ref(), &item_id)
        .await?;
    Ok(Json(removed))
}

/// `DELETE {prefix}`, responds with every removed record.
pub async fn delete_all_handler<T: CRUDResource>(
    State(state): State<CrudState<T>>,
) -> Result<Json<Vec<T>>, ApiError> {
    let removed = state.operations.delete_all(state.store.as_ref()).await?;
    Ok(Json(removed))
}
