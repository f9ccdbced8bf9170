//! Facet option lists (colors, genres, sizes, ages, categories).
//!
//! Each list is loaded once per view and reported through
//! [`FacetOptionsState`]. A stuck request is reported as `TimedOut` after
//! the configured display timeout while the request itself keeps running
//! on its own task, so a late answer still lands in the response cache.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::catalog::filters::{ActiveCategory, Facet};
use crate::catalog::slug::slug_from_name;
use crate::catalog::types::{Age, Category, Color, Genre, Size};
use crate::config::CatalogConfig;
use crate::graphql::operations::{
    GET_ALL_AGES, GET_ALL_CATEGORIES, GET_ALL_COLORS, GET_ALL_GENRES, GET_ALL_SIZES,
};
use crate::graphql::{FetchPolicy, GraphqlClient, GraphqlError, Operation};
use crate::state::mvi::StoreState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Color,
    Genre,
    Size,
    Age,
    Category,
}

impl FacetKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "color" | "colors" => Some(FacetKind::Color),
            "genre" | "genres" => Some(FacetKind::Genre),
            "size" | "sizes" => Some(FacetKind::Size),
            "age" | "ages" => Some(FacetKind::Age),
            "category" | "categories" => Some(FacetKind::Category),
            _ => None,
        }
    }

    /// The filter facet fed by this list. Categories are selected one at
    /// a time and are not a facet set.
    pub fn facet(&self) -> Option<Facet> {
        match self {
            FacetKind::Color => Some(Facet::Color),
            FacetKind::Genre => Some(Facet::Genre),
            FacetKind::Size => Some(Facet::Size),
            FacetKind::Age => Some(Facet::Age),
            FacetKind::Category => None,
        }
    }

    fn source(&self) -> (&'static Operation, &'static str) {
        match self {
            FacetKind::Color => (&GET_ALL_COLORS, "getAllColors"),
            FacetKind::Genre => (&GET_ALL_GENRES, "getAllGenres"),
            FacetKind::Size => (&GET_ALL_SIZES, "getAllSizes"),
            FacetKind::Age => (&GET_ALL_AGES, "getAllAges"),
            FacetKind::Category => (&GET_ALL_CATEGORIES, "getAllCategories"),
        }
    }
}

/// A selectable option of a facet list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetOptionsState {
    #[default]
    Loading,
    Ready(Vec<FacetOption>),
    Failed(String),
    TimedOut,
}

impl StoreState for FacetOptionsState {}

impl FacetOptionsState {
    pub fn options(&self) -> &[FacetOption] {
        match self {
            FacetOptionsState::Ready(options) => options,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FacetOptionsState::Loading)
    }
}

/// Runs facet option requests under a display timeout.
#[derive(Debug, Clone)]
pub struct FacetLoader {
    timeout: Duration,
}

impl FacetLoader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(Duration::from_millis(config.facet_timeout_ms))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Spawn `fetch` and wait for it up to the display timeout.
    pub async fn load<F>(&self, fetch: F) -> FacetOptionsState
    where
        F: Future<Output = Result<Vec<FacetOption>, GraphqlError>> + Send + 'static,
    {
        let handle = tokio::spawn(fetch);
        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(Ok(options))) => {
                debug!(count = options.len(), "Facet options loaded");
                FacetOptionsState::Ready(options)
            }
            Ok(Ok(Err(e))) => {
                warn!(error = %e, error_type = e.error_type(), "Facet options failed");
                FacetOptionsState::Failed(e.to_string())
            }
            Ok(Err(join_error)) => {
                warn!(error = %join_error, "Facet options task aborted");
                FacetOptionsState::Failed(join_error.to_string())
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Facet options timed out"
                );
                FacetOptionsState::TimedOut
            }
        }
    }

    /// Load the option list for `kind` from the backend.
    pub async fn load_kind(&self, client: &GraphqlClient, kind: FacetKind) -> FacetOptionsState {
        let client = client.clone();
        self.load(async move { fetch_facet_options(&client, kind).await })
            .await
    }
}

/// Query the option list for `kind` and map it to `{id, label}` pairs.
pub async fn fetch_facet_options(
    client: &GraphqlClient,
    kind: FacetKind,
) -> Result<Vec<FacetOption>, GraphqlError> {
    let options = match kind {
        FacetKind::Color => fetch_list::<Color>(client, kind)
            .await?
            .into_iter()
            .map(|c| option(c.id, c.color))
            .collect(),
        FacetKind::Genre => fetch_list::<Genre>(client, kind)
            .await?
            .into_iter()
            .map(|g| option(g.id, g.genre))
            .collect(),
        FacetKind::Size => fetch_list::<Size>(client, kind)
            .await?
            .into_iter()
            .map(|s| option(s.id, s.size))
            .collect(),
        FacetKind::Age => fetch_list::<Age>(client, kind)
            .await?
            .into_iter()
            .map(|a| option(a.id, a.range))
            .collect(),
        FacetKind::Category => fetch_categories(client)
            .await?
            .into_iter()
            .map(|c| option(c.id, c.name))
            .collect(),
    };
    Ok(options)
}

pub async fn fetch_categories(client: &GraphqlClient) -> Result<Vec<Category>, GraphqlError> {
    fetch_list::<Category>(client, FacetKind::Category).await
}

async fn fetch_list<T: DeserializeOwned>(
    client: &GraphqlClient,
    kind: FacetKind,
) -> Result<Vec<T>, GraphqlError> {
    let (operation, field) = kind.source();
    client
        .query(operation, field, &json!({}), FetchPolicy::CacheFirst)
        .await
}

fn option(id: i64, label: String) -> FacetOption {
    FacetOption {
        id: id.to_string(),
        label,
    }
}

/// Find the category a route slug refers to. Matches the stored slug
/// first, then the slug generated from the name.
pub fn resolve_category(categories: &[Category], slug: &str) -> Option<ActiveCategory> {
    categories
        .iter()
        .find(|c| c.slug.as_deref() == Some(slug))
        .or_else(|| categories.iter().find(|c| slug_from_name(&c.name) == slug))
        .map(ActiveCategory::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, slug: Option<&str>) -> Category {
        Category {
            id,
            name: name.to_string(),
            slug: slug.map(str::to_string),
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
        }
    }

    #[tokio::test]
    async fn ready_when_fetch_finishes_in_time() {
        let loader = FacetLoader::new(Duration::from_millis(200));
        let state = loader
            .load(async { Ok(vec![option(1, "Rojo".to_string())]) })
            .await;
        assert_eq!(state.options().len(), 1);
        assert_eq!(state.options()[0].id, "1");
    }

    #[tokio::test]
    async fn failure_is_distinct_from_timeout() {
        let loader = FacetLoader::new(Duration::from_millis(200));
        let state = loader
            .load(async {
                Err(GraphqlError::Status {
                    status: 500,
                    body: "down".to_string(),
                })
            })
            .await;
        assert!(matches!(state, FacetOptionsState::Failed(msg) if msg.contains("500")));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_reports_timed_out() {
        let loader = FacetLoader::new(Duration::from_millis(5000));
        let state = loader
            .load(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Vec::new())
            })
            .await;
        assert_eq!(state, FacetOptionsState::TimedOut);
    }

    #[test]
    fn resolves_category_by_slug_or_name() {
        let categories = vec![
            category(1, "Remeras", Some("remeras")),
            category(2, "Ropa Niño", None),
        ];
        assert_eq!(
            resolve_category(&categories, "ropa-nino"),
            Some(ActiveCategory::new("Ropa Niño", 2))
        );
        assert_eq!(resolve_category(&categories, "remeras").map(|c| c.id), Some(1));
        assert_eq!(
            resolve_category(&categories, "remeras").map(|c| c.slug),
            Some("remeras".to_string())
        );
        assert!(resolve_category(&categories, "zapatos").is_none());
    }

    #[test]
    fn kind_parses_singular_and_plural() {
        assert_eq!(FacetKind::parse("Colors"), Some(FacetKind::Color));
        assert_eq!(FacetKind::parse("category"), Some(FacetKind::Category));
        assert_eq!(FacetKind::Category.facet(), None);
        assert!(FacetKind::parse("brand").is_none());
    }
}
