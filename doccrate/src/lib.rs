//! # doccrate
//!
//! CRUD routers for Axum backed by document collections.
//!
//! Describe a record once, pick a backing store, and get list, get-one,
//! create, update, delete-one and delete-all routes with pagination,
//! not-found handling and an OpenAPI description.
//!
//! ```rust,ignore
//! use doccrate::{CrudRouter, DocumentToModels, MongoStore, StoreConfig};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize, DocumentToModels)]
//! #[doccrate(name_singular = "widget", description = "Things on the shelf")]
//! pub struct Widget {
//!     pub id: String,
//!     pub name: String,
//!     pub size: Option<i64>,
//! }
//!
//! let config = StoreConfig::from_env();
//! let store = MongoStore::connect(&config, config.collection_for::<Widget>()).await?;
//! let app: axum::Router = CrudRouter::<Widget>::new(store)
//!     .with_config(&config)
//!     .into_router();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: the [`CRUDResource`] trait and untyped [`Document`]s
//! - [`store`]: the [`DocumentStore`] interface and its adapters
//! - [`operations`]: the six typed operations, overridable per resource
//! - [`router`]: the [`CrudRouter`] builder

pub mod config;
pub mod core;
pub mod errors;
pub mod openapi;
pub mod operations;
pub mod pagination;
pub mod router;
pub mod routes;
pub mod store;

pub use config::StoreConfig;
pub use crate::core::{CRUDResource, Document, ID_FIELD};
pub use errors::ApiError;
pub use operations::{CRUDOperations, DefaultCRUDOperations};
pub use pagination::{DEFAULT_PAGE_SIZE, PageWindow, Pagination};
pub use router::{CrudRouter, Operation, RouteGuard};
pub use store::{DocumentStore, MemoryStore, StoreError};

#[cfg(feature = "mongodb")]
pub use store::MongoStore;
#[cfg(feature = "sql")]
pub use store::SqlStore;

#[cfg(feature = "derive")]
pub use doccrate_derive::DocumentToModels;

// Used by code generated with `DocumentToModels`.
pub use serde;
pub use serde_with;
