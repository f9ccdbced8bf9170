//! Shop routes and the navigation side effects of filter changes.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use url::{Position, Url};

use crate::catalog::slug::percent_decode;

const ROUTE_BASE: &str = "http://storefront.local/";

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Invalid route URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Not a shop route: {0}")]
    NotShopPath(String),
}

/// `/shop` or `/shop/<category-slug>` with the `search` and `page` params.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShopRoute {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl ShopRoute {
    pub fn shop() -> Self {
        Self::default()
    }

    pub fn category(slug: impl Into<String>) -> Self {
        Self {
            category: Some(slug.into()),
            ..Self::default()
        }
    }

    /// Parse an absolute URL or a root-relative path such as
    /// `/shop/remeras?page=2`.
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(ROUTE_BASE)?.join(input)?,
            Err(e) => return Err(e.into()),
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let category = match segments.as_slice() {
            ["shop"] => None,
            ["shop", slug] => Some(percent_decode(slug)),
            _ => return Err(RouteError::NotShopPath(url.path().to_string())),
        };

        let mut route = Self {
            category,
            ..Self::default()
        };
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "search" if !value.trim().is_empty() => route.search = Some(value.into_owned()),
                "page" => route.page = value.parse::<u32>().ok().filter(|page| *page >= 1),
                _ => {}
            }
        }
        Ok(route)
    }

    pub fn is_category_scoped(&self) -> bool {
        self.category.is_some()
    }

    /// Root-relative URL of this route.
    pub fn to_url(&self) -> String {
        let Ok(mut url) = Url::parse(ROUTE_BASE) else {
            return "/shop".to_string();
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().push("shop");
            if let Some(slug) = &self.category {
                segments.push(slug);
            }
        }
        if self.search.is_some() || self.page.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(search) = &self.search {
                query.append_pair("search", search);
            }
            if let Some(page) = self.page {
                query.append_pair("page", &page.to_string());
            }
        }
        url[Position::BeforePath..].to_string()
    }
}

/// A URL change requested by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// New history entry.
    Push(String),
    /// Rewrite the current entry.
    Replace(String),
}

impl Navigation {
    pub fn url(&self) -> &str {
        match self {
            Navigation::Push(url) | Navigation::Replace(url) => url,
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, navigation: Navigation);
}

/// Navigator that keeps every request in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    history: Arc<Mutex<Vec<Navigation>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<Navigation> {
        self.history.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, navigation: Navigation) {
        tracing::debug!(url = navigation.url(), "Navigation requested");
        self.history.lock().push(navigation);
    }
}
