use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::catalog::filters::{ProductQuery, ProductSearch};
use crate::catalog::slug::slug_variations;
use crate::catalog::types::{Product, ProductPage, ProductSummary, RailProduct};
use crate::config::CatalogConfig;
use crate::graphql::operations::{
    FIND_PRODUCTS_WITH_CATEGORIES, FIND_PRODUCTS_WITH_GENRES, GET_PRODUCTS_BY_RELATION,
    GET_PRODUCT_BY_SLUG, GET_RELATED_PRODUCTS,
};
use crate::graphql::{FetchPolicy, GraphqlClient, GraphqlError, Operation};

/// What a home-page rail is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailRelation {
    Genre,
    Category,
}

impl RailRelation {
    fn operation(self) -> &'static Operation {
        match self {
            RailRelation::Genre => &FIND_PRODUCTS_WITH_GENRES,
            RailRelation::Category => &FIND_PRODUCTS_WITH_CATEGORIES,
        }
    }
}

/// Product queries against the GraphQL backend.
#[derive(Clone)]
pub struct ProductCatalog {
    client: GraphqlClient,
    related_limit: u32,
}

impl ProductCatalog {
    pub fn new(client: GraphqlClient, config: &CatalogConfig) -> Self {
        Self {
            client,
            related_limit: config.related_limit,
        }
    }

    pub fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// One page of filtered search results.
    pub async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, GraphqlError> {
        self.client
            .query(
                &GET_PRODUCTS_BY_RELATION,
                "findProductsByRelation",
                query,
                FetchPolicy::CacheFirst,
            )
            .await
    }

    /// Resolve a product from a route slug, trying each slug variation in
    /// turn. Errors on one variation are logged and the next is tried.
    ///
    /// Returns `Ok(None)` when no variation matched, and the last error
    /// only when every variation failed to reach an answer.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, GraphqlError> {
        let mut last_error = None;
        let mut answered = false;

        for identifier in slug_variations(slug) {
            let result: Result<Option<Product>, GraphqlError> = self
                .client
                .query(
                    &GET_PRODUCT_BY_SLUG,
                    "getProduct",
                    &json!({ "identifier": identifier }),
                    FetchPolicy::NoCache,
                )
                .await;

            match result {
                Ok(Some(product)) => {
                    debug!(slug, identifier = %identifier, id = product.id, "Product resolved");
                    return Ok(Some(product));
                }
                Ok(None) => answered = true,
                Err(e) => {
                    warn!(
                        identifier = %identifier,
                        error = %e,
                        error_type = e.error_type(),
                        "Product lookup failed, trying next variation"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !answered => Err(e),
            _ => Ok(None),
        }
    }

    /// Every product listed under one genre or category.
    pub async fn products_by_relation(
        &self,
        relation: RailRelation,
        id: i64,
    ) -> Result<Vec<RailProduct>, GraphqlError> {
        self.client
            .query(
                relation.operation(),
                "findAllProducts",
                &json!({ "id": id }),
                FetchPolicy::CacheFirst,
            )
            .await
    }

    /// Products related to `product_id`. Failures yield an empty list.
    pub async fn related_products(&self, product_id: i64) -> Vec<ProductSummary> {
        let result: Result<Vec<ProductSummary>, GraphqlError> = self
            .client
            .query(
                &GET_RELATED_PRODUCTS,
                "getRelatedProducts",
                &json!({ "productId": product_id, "limit": self.related_limit }),
                FetchPolicy::CacheFirst,
            )
            .await;

        result.unwrap_or_else(|e| {
            warn!(product_id, error = %e, "Related products unavailable");
            Vec::new()
        })
    }
}

/// Home-page product carousel showing one genre or category at a time.
#[derive(Debug, Clone)]
pub struct ProductRail {
    relation: RailRelation,
    active: Option<i64>,
    products: Vec<RailProduct>,
}

impl ProductRail {
    pub fn new(relation: RailRelation) -> Self {
        Self {
            relation,
            active: None,
            products: Vec::new(),
        }
    }

    pub fn relation(&self) -> RailRelation {
        self.relation
    }

    pub fn active(&self) -> Option<i64> {
        self.active
    }

    pub fn products(&self) -> &[RailProduct] {
        &self.products
    }

    /// Initial load: show the first option once the option list is known.
    /// Does nothing when a selection exists or there are no options.
    pub async fn load_first(
        &mut self,
        catalog: &ProductCatalog,
        option_ids: &[i64],
    ) -> Result<bool, GraphqlError> {
        match (self.active, option_ids.first()) {
            (None, Some(&first)) => self.select(catalog, first).await,
            _ => Ok(false),
        }
    }

    /// Switch the rail to `id`. Reselecting the shown option issues no
    /// query. Returns whether products were fetched.
    pub async fn select(&mut self, catalog: &ProductCatalog, id: i64) -> Result<bool, GraphqlError> {
        if self.active == Some(id) {
            return Ok(false);
        }
        let products = catalog.products_by_relation(self.relation, id).await?;
        debug!(relation = ?self.relation, id, count = products.len(), "Rail loaded");
        self.active = Some(id);
        self.products = products;
        Ok(true)
    }
}

#[async_trait]
impl ProductSearch for ProductCatalog {
    async fn search(&self, query: &ProductQuery) -> Result<ProductPage, GraphqlError> {
        self.search_products(query).await
    }
}
