use std::env;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::core::CRUDResource;

pub const DEFAULT_DB_URL: &str = "mongodb://localhost";
pub const DEFAULT_DATABASE: &str = "db";

/// Where a collection router keeps its records.
///
/// Loaded from the environment with [`StoreConfig::from_env`], deserialized
/// from an application's own config file, or built by hand:
///
/// ```rust,ignore
/// let config = StoreConfig {
///     database: "inventory".into(),
///     ..StoreConfig::default()
/// };
/// let store = MongoStore::connect(&config, config.collection_for::<Widget>()).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection URL. `mongodb://` for [`MongoStore`](crate::MongoStore),
    /// `sqlite:`/`postgres:`/`mysql:` for [`SqlStore`](crate::SqlStore).
    pub db_url: String,
    /// Database name. Only meaningful for MongoDB.
    pub database: String,
    /// Overrides the resource's `COLLECTION_NAME`.
    pub collection: Option<String>,
    /// Router page size; `None` keeps the default of 100 with no maximum.
    /// Zero is rejected when deserializing.
    pub page_size: Option<NonZeroU64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: None,
            page_size: None,
        }
    }
}

impl StoreConfig {
    /// Read `DOCCRATE_DB_URL`, `DOCCRATE_DATABASE`, `DOCCRATE_COLLECTION` and
    /// `DOCCRATE_PAGE_SIZE`, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let page_size = lookup("DOCCRATE_PAGE_SIZE").and_then(|raw| match raw.parse::<NonZeroU64>() {
            Ok(size) => Some(size),
            _ => {
                tracing::warn!(value = %raw, "ignoring invalid DOCCRATE_PAGE_SIZE");
                None
            }
        });

        Self {
            db_url: lookup("DOCCRATE_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string()),
            database: lookup("DOCCRATE_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: lookup("DOCCRATE_COLLECTION").filter(|name| !name.is_empty()),
            page_size,
        }
    }

    /// The collection to use for `T`: the configured override, else
    /// `T::COLLECTION_NAME`.
    #[must_use]
    pub fn collection_for<T: CRUDResource>(&self) -> &str {
        self.collection.as_deref().unwrap_or(T::COLLECTION_NAME)
    }
}
