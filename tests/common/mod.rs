//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_graphql;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::catalog::filters::{ProductQuery, ProductSearch};
use storefront::catalog::{ProductPage, ProductSummary};
use storefront::config::BackendConfig;
use storefront::graphql::{GraphqlClient, GraphqlError};
use storefront::state::cart::CartItem;
use tempfile::TempDir;
use tokio::sync::Mutex;

pub use mock_graphql::{CapturedRequest, MockGraphql, MockResponse};

/// Client pointed at a mock server with short timeouts.
pub fn client_for(mock: &MockGraphql) -> GraphqlClient {
    let config = BackendConfig {
        graphql_url: mock.endpoint(),
        timeout_seconds: 2,
        connect_timeout_seconds: 1,
    };
    GraphqlClient::new(&config).expect("client builds")
}

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

// -- Catalog fixtures ---------------------------------------------------------

pub fn product(id: i64) -> ProductSummary {
    ProductSummary {
        id,
        name: format!("Producto {}", id),
        price: 1000.0 + id as f64,
        slug: format!("producto-{}", id),
        description: None,
    }
}

/// A page holding products `ids`, with `more` as the "more pages" flag.
pub fn page(ids: impl IntoIterator<Item = i64>, more: bool) -> ProductPage {
    ProductPage {
        products: ids.into_iter().map(product).collect(),
        is_products: more,
    }
}

pub fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Producto {}", id),
        "price": 1000.0 + id as f64,
        "slug": format!("producto-{}", id),
        "description": null
    })
}

/// Product search that replays queued pages and records every query.
#[derive(Clone, Default)]
pub struct ScriptedSearch {
    pages: Arc<Mutex<VecDeque<Result<ProductPage, GraphqlError>>>>,
    queries: Arc<Mutex<Vec<ProductQuery>>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, result: Result<ProductPage, GraphqlError>) {
        self.pages.lock().await.push_back(result);
    }

    pub async fn queries(&self) -> Vec<ProductQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl ProductSearch for ScriptedSearch {
    async fn search(&self, query: &ProductQuery) -> Result<ProductPage, GraphqlError> {
        self.queries.lock().await.push(query.clone());
        self.pages
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(page(Vec::new(), false)))
    }
}

// -- Cart fixtures ------------------------------------------------------------

pub fn cart_item(id: i64, quantity: u32, max_quantity: u32) -> CartItem {
    CartItem {
        id,
        name: format!("Producto {}", id),
        slug: format!("producto-{}", id),
        price: 100.0,
        description: None,
        quantity,
        selected_color: None,
        selected_size: None,
        max_quantity,
        image: None,
        selected_color_name: None,
        selected_size_name: None,
    }
}
