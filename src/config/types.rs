use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// GraphQL backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// GraphQL endpoint (e.g., "http://localhost:4000/graphql").
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Product browsing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// How long a facet option list may stay loading before it is
    /// reported as timed out (default: 5000).
    #[serde(default = "default_facet_timeout_ms")]
    pub facet_timeout_ms: u64,
    /// Number of related products requested on a detail page (default: 4).
    #[serde(default = "default_related_limit")]
    pub related_limit: u32,
}

/// Payment gateway settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Public base URL of the storefront, used for gateway return URLs.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    #[serde(default = "default_currency_id")]
    pub currency_id: String,
    #[serde(default = "default_installments")]
    pub installments: u32,
    #[serde(default = "default_statement_descriptor")]
    pub statement_descriptor: String,
}

/// Where persisted client state lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for the local store file. Falls back to
    /// `dirs::data_dir()/storefront` when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_graphql_url() -> String {
    "http://localhost:4000/graphql".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_facet_timeout_ms() -> u64 {
    5000
}

fn default_related_limit() -> u32 {
    4
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_currency_id() -> String {
    "ARS".to_string()
}

fn default_installments() -> u32 {
    12
}

fn default_statement_descriptor() -> String {
    "TU_TIENDA".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            facet_timeout_ms: default_facet_timeout_ms(),
            related_limit: default_related_limit(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            frontend_url: default_frontend_url(),
            currency_id: default_currency_id(),
            installments: default_installments(),
            statement_descriptor: default_statement_descriptor(),
        }
    }
}

impl StorageConfig {
    /// Resolve the local store file path.
    pub fn store_path(&self) -> PathBuf {
        let dir = self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("storefront")
        });
        dir.join("local_store.json")
    }
}
