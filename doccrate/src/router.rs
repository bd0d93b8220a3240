//! # Collection routers
//!
//! [`CrudRouter`] binds one [`CRUDResource`] to one [`DocumentStore`] and turns
//! it into an `axum::Router` with up to six routes:
//!
//! | Operation | Route |
//! |---|---|
//! | [`Operation::GetAll`] | `GET {prefix}?skip&limit` |
//! | [`Operation::Create`] | `POST {prefix}` |
//! | [`Operation::DeleteAll`] | `DELETE {prefix}` |
//! | [`Operation::GetOne`] | `GET {prefix}/{item_id}` |
//! | [`Operation::Update`] | `PUT {prefix}/{item_id}` |
//! | [`Operation::DeleteOne`] | `DELETE {prefix}/{item_id}` |
//!
//! ```rust,ignore
//! let store = MongoStore::connect(&config, "widgets").await?;
//! let app = CrudRouter::<Widget>::new(store)
//!     .paginate(50)
//!     .disable(Operation::DeleteAll)
//!     .guard(Operation::Create, require_token)
//!     .into_router();
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Request, State},
    http::{Method, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{MethodRouter, delete, get, post, put},
};

use crate::config::StoreConfig;
use crate::core::CRUDResource;
use crate::errors::ApiError;
use crate::operations::{CRUDOperations, DefaultCRUDOperations};
use crate::routes::{
    CrudState, create_one_handler, delete_all_handler, delete_one_handler, get_all_handler,
    get_one_handler, update_one_handler,
};
use crate::store::DocumentStore;

/// One of the six generated routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAll,
    GetOne,
    Create,
    Update,
    DeleteOne,
    DeleteAll,
}

impl Operation {
    pub const ALL: [Self; 6] = [
        Self::GetAll,
        Self::Create,
        Self::DeleteAll,
        Self::GetOne,
        Self::Update,
        Self::DeleteOne,
    ];

    const fn index(self) -> usize {
        match self {
            Self::GetAll => 0,
            Self::GetOne => 1,
            Self::Create => 2,
            Self::Update => 3,
            Self::DeleteOne => 4,
            Self::DeleteAll => 5,
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::GetAll | Self::GetOne => Method::GET,
            Self::Create => Method::POST,
            Self::Update => Method::PUT,
            Self::DeleteOne | Self::DeleteAll => Method::DELETE,
        }
    }

    /// Whether the route is addressed by `{item_id}`.
    #[must_use]
    pub const fn is_item_route(self) -> bool {
        matches!(self, Self::GetOne | Self::Update | Self::DeleteOne)
    }
}

/// A check run before a route's handler, the per-route dependency of the
/// generated API. The first guard that fails decides the response and the
/// handler is never called.
///
/// Plain closures `Fn(&Parts) -> Result<(), ApiError>` are guards too.
#[async_trait]
pub trait RouteGuard: Send + Sync + 'static {
    async fn check(&self, parts: &Parts) -> Result<(), ApiError>;
}

#[async_trait]
impl<F> RouteGuard for F
where
    F: Fn(&Parts) -> Result<(), ApiError> + Send + Sync + 'static,
{
    async fn check(&self, parts: &Parts) -> Result<(), ApiError> {
        self(parts)
    }
}

#[derive(Clone)]
struct GuardChain(Arc<[Arc<dyn RouteGuard>]>);

async fn run_guards(State(chain): State<GuardChain>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    for guard in chain.0.iter() {
        if let Err(err) = guard.check(&parts).await {
            return err.into_response();
        }
    }
    next.run(Request::from_parts(parts, body)).await
}

#[derive(Clone)]
struct RouteSetting {
    enabled: bool,
    guards: Vec<Arc<dyn RouteGuard>>,
}

impl Default for RouteSetting {
    fn default() -> Self {
        Self {
            enabled: true,
            guards: Vec::new(),
        }
    }
}

/// Builder for the routes of one collection.
pub struct CrudRouter<T: CRUDResource> {
    store: Arc<dyn DocumentStore>,
    operations: Arc<dyn CRUDOperations<Resource = T>>,
    prefix: String,
    tags: Vec<String>,
    paginate: Option<u64>,
    routes: [RouteSetting; 6],
}

impl<T: CRUDResource> CrudRouter<T> {
    /// All six routes enabled, mounted at `/{RESOURCE_NAME_PLURAL}`.
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self::with_store(Arc::new(store))
    }

    /// Same as [`CrudRouter::new`] for a store that is shared elsewhere.
    #[must_use]
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            operations: Arc::new(DefaultCRUDOperations::<T>::new()),
            prefix: normalize_prefix(T::RESOURCE_NAME_PLURAL),
            tags: vec![T::RESOURCE_NAME_PLURAL.to_string()],
            paginate: None,
            routes: std::array::from_fn(|_| RouteSetting::default()),
        }
    }

    /// Replace the default operations with a custom implementation.
    #[must_use]
    pub fn operations(mut self, operations: impl CRUDOperations<Resource = T> + 'static) -> Self {
        self.operations = Arc::new(operations);
        self
    }

    /// Path the routes are mounted under. `""` or `"/"` mounts at the root.
    #[must_use]
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    /// OpenAPI tags for every route.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum page size, also used when a request gives no `limit`.
    /// A page size of zero is ignored.
    #[must_use]
    pub fn paginate(mut self, page_size: u64) -> Self {
        if page_size == 0 {
            tracing::warn!("ignoring page size 0");
            return self;
        }
        self.paginate = Some(page_size);
        self
    }

    /// Apply the router-level parts of a [`StoreConfig`].
    #[must_use]
    pub fn with_config(mut self, config: &StoreConfig) -> Self {
        if let Some(page_size) = config.page_size {
            self.paginate = Some(page_size.get());
        }
        self
    }

    #[must_use]
    pub fn route(mut self, operation: Operation, enabled: bool) -> Self {
        self.routes[operation.index()].enabled = enabled;
        self
    }

    #[must_use]
    pub fn disable(self, operation: Operation) -> Self {
        self.route(operation, false)
    }

    /// Add a guard to one route. Guards run in the order they were added.
    #[must_use]
    pub fn guard(mut self, operation: Operation, guard: impl RouteGuard) -> Self {
        self.routes[operation.index()].guards.push(Arc::new(guard));
        self
    }

    /// Add the same guard to every route.
    #[must_use]
    pub fn guard_all(mut self, guard: impl RouteGuard) -> Self {
        let guard: Arc<dyn RouteGuard> = Arc::new(guard);
        for setting in &mut self.routes {
            setting.guards.push(Arc::clone(&guard));
        }
        self
    }

    #[must_use]
    pub fn is_enabled(&self, operation: Operation) -> bool {
        self.routes[operation.index()].enabled
    }

    /// Enabled operations, collection routes first.
    #[must_use]
    pub fn enabled_operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|operation| self.is_enabled(*operation))
            .collect()
    }

    #[must_use]
    pub fn tag_names(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn page_size(&self) -> Option<u64> {
        self.paginate
    }

    #[must_use]
    pub fn collection_path(&self) -> String {
        if self.prefix.is_empty() {
            "/".to_string()
        } else {
            self.prefix.clone()
        }
    }

    #[must_use]
    pub fn item_path(&self) -> String {
        format!("{}/{{item_id}}", self.prefix)
    }

    #[must_use]
    pub fn path_for(&self, operation: Operation) -> String {
        if operation.is_item_route() {
            self.item_path()
        } else {
            self.collection_path()
        }
    }

    /// OpenAPI description of the enabled routes.
    #[must_use]
    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        crate::openapi::document(self)
    }

    /// Build the `axum::Router` holding the enabled routes.
    pub fn into_router<S>(self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let collection_path = self.collection_path();
        let item_path = self.item_path();
        let state = CrudState {
            store: self.store,
            operations: self.operations,
            paginate: self.paginate,
        };

        let mut router: Router<CrudState<T>> = Router::new();
        for operation in Operation::ALL {
            let setting = &self.routes[operation.index()];
            if !setting.enabled {
                continue;
            }
            let mut method_router: MethodRouter<CrudState<T>> = match operation {
                Operation::GetAll => get(get_all_handler::<T>),
                Operation::GetOne => get(get_one_handler::<T>),
                Operation::Create => post(create_one_handler::<T>),
                Operation::Update => put(update_one_handler::<T>),
                Operation::DeleteOne => delete(delete_one_handler::<T>),
                Operation::DeleteAll => delete(delete_all_handler::<T>),
            };
            if !setting.guards.is_empty() {
                let chain = GuardChain(setting.guards.clone().into());
                method_router =
                    method_router.route_layer(middleware::from_fn_with_state(chain, run_guards));
            }
            let path = if operation.is_item_route() {
                &item_path
            } else {
                &collection_path
            };
            tracing::debug!(method = %operation.method(), path = %path, "registering route");
            router = router.route(path, method_router);
        }
        router.with_state(state)
    }
}

impl<T: CRUDResource> From<CrudRouter<T>> for Router {
    fn from(router: CrudRouter<T>) -> Self {
        router.into_router()
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
