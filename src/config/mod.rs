mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{BackendConfig, CatalogConfig, CheckoutConfig, Config, StorageConfig};
