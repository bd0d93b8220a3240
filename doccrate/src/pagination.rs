use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::ApiError;

/// Page size used when neither the request nor the router sets one.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Query parameters accepted by the list route.
///
/// Example: `GET /widgets?skip=20&limit=10`
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of records to skip from the start of the collection.
    #[param(example = 0)]
    pub skip: Option<i64>,
    /// Maximum number of records to return.
    #[param(example = 100)]
    pub limit: Option<i64>,
}

/// Validated skip/limit pair handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Validates the query and clamps it into a window.
    ///
    /// `max_limit` is the router's page size: it caps `limit` and replaces a
    /// missing one. Without it, a missing `limit` means [`DEFAULT_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ValidationFailed`] for a negative `skip`, a
    /// non-positive `limit`, or a `limit` above `max_limit`.
    pub fn window(&self, max_limit: Option<u64>) -> Result<PageWindow, ApiError> {
        let skip = match self.skip {
            None => 0,
            Some(skip) => u64::try_from(skip).map_err(|_| {
                ApiError::validation_failed(vec![
                    "skip query parameter must be greater or equal to zero".to_string(),
                ])
            })?,
        };

        let limit = match self.limit {
            None => max_limit.unwrap_or(DEFAULT_PAGE_SIZE),
            Some(limit) => {
                let limit = u64::try_from(limit)
                    .ok()
                    .filter(|limit| *limit > 0)
                    .ok_or_else(|| {
                        ApiError::validation_failed(vec![
                            "limit query parameter must be greater then zero".to_string(),
                        ])
                    })?;
                if let Some(max) = max_limit
                    && limit > max
                {
                    return Err(ApiError::validation_failed(vec![format!(
                        "limit query parameter must be less then {max}"
                    )]));
                }
                limit
            }
        };

        Ok(PageWindow { skip, limit })
    }
}
