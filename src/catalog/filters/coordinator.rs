//! Filter and pagination coordinator for the shop listing.
//!
//! The coordinator owns the filter selection, the accumulated product
//! pages and the current route. It is split into a synchronous core and
//! thin async drivers:
//!
//! ```text
//! dispatch / begin_refetch / begin_load_more ──→ PendingFetch
//!                                                    │ (caller or execute())
//!                                                    ▼
//!                    complete(pending, result) ──→ FetchOutcome
//! ```
//!
//! Every fetch carries a sequence token. Only the most recently issued
//! token may update the accumulator; earlier responses are discarded.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::catalog::types::ProductPage;
use crate::graphql::GraphqlError;
use crate::state::mvi::Reducer;

use super::intent::FilterIntent;
use super::query::ProductQuery;
use super::reducer::FilterReducer;
use super::route::{Navigation, Navigator, ShopRoute};
use super::state::{ActiveCategory, Facet, FilterSelection, PageAccumulator, SortMode};

/// Backend product search.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    async fn search(&self, query: &ProductQuery) -> Result<ProductPage, GraphqlError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Page 1 replacing the accumulated products.
    Replace,
    /// Next page appended to the accumulated products.
    Append,
}

/// A fetch issued by the coordinator and not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    token: u64,
    mode: FetchMode,
    query: ProductQuery,
}

impl PendingFetch {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    pub fn query(&self) -> &ProductQuery {
        &self.query
    }
}

/// Last fetch error, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub error_type: &'static str,
    pub message: String,
}

impl From<&GraphqlError> for FetchFailure {
    fn from(error: &GraphqlError) -> Self {
        Self {
            error_type: error.error_type(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { added: usize },
    Failed,
    /// A newer fetch was issued; the response was dropped.
    Stale,
}

pub struct FilterCoordinator<S, N> {
    search: S,
    navigator: N,
    route: ShopRoute,
    /// Category the route segment resolved to.
    route_category: Option<ActiveCategory>,
    selection: FilterSelection,
    accumulator: PageAccumulator,
    in_flight: bool,
    error: Option<FetchFailure>,
    next_token: u64,
    current_token: Option<u64>,
}

impl<S: ProductSearch, N: Navigator> FilterCoordinator<S, N> {
    /// Create a coordinator for `route`. `route_category` is the category
    /// the route slug resolved to, if any.
    pub fn new(
        search: S,
        navigator: N,
        route: ShopRoute,
        route_category: Option<ActiveCategory>,
    ) -> Self {
        let selection = FilterSelection {
            category: route_category.clone(),
            search_term: route.search.clone().unwrap_or_default(),
            ..FilterSelection::default()
        };
        Self {
            search,
            navigator,
            route,
            route_category,
            selection,
            accumulator: PageAccumulator::default(),
            in_flight: false,
            error: None,
            next_token: 1,
            current_token: None,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn accumulator(&self) -> &PageAccumulator {
        &self.accumulator
    }

    pub fn route(&self) -> &ShopRoute {
        &self.route
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        self.error.as_ref()
    }

    // ── synchronous core ─────────────────────────────────────────

    /// Apply a filter change. Returns the page-1 fetch to run, or `None`
    /// when nothing changed, the change turned into a navigation, or the
    /// new selection has nothing to search for.
    pub fn dispatch(&mut self, intent: FilterIntent) -> Option<PendingFetch> {
        let intent = match intent {
            FilterIntent::SetCategory(category) => {
                if let Some(navigation) = self.category_navigation(&category) {
                    self.navigator.navigate(navigation);
                    return None;
                }
                match &self.route_category {
                    Some(resolved) if resolved.same_as(&category) => {
                        FilterIntent::SetCategory(resolved.clone())
                    }
                    _ => FilterIntent::SetCategory(category),
                }
            }
            FilterIntent::ClearCategory if self.route.is_category_scoped() => {
                self.navigator
                    .navigate(Navigation::Push(ShopRoute::shop().to_url()));
                return None;
            }
            FilterIntent::ClearAll { .. } => FilterIntent::ClearAll {
                keep_category: self.route.is_category_scoped(),
            },
            other => other,
        };

        let is_search = matches!(intent, FilterIntent::SetSearchTerm(_));
        let is_clear = matches!(intent, FilterIntent::ClearAll { .. });

        let next = FilterReducer::reduce(self.selection.clone(), intent);
        if next == self.selection && !is_clear {
            return None;
        }
        self.selection = next;

        if is_search {
            self.route.search = self.selection.trimmed_search().map(str::to_string);
            self.route.page = None;
            self.navigator.navigate(Navigation::Push(self.route.to_url()));
        } else if is_clear {
            if self.route.search.is_some() || self.route.page.is_some() {
                self.route.search = None;
                self.route.page = None;
                self.navigator
                    .navigate(Navigation::Replace(self.route.to_url()));
            }
        } else if self.route.page.take().is_some() {
            self.navigator
                .navigate(Navigation::Replace(self.route.to_url()));
        }

        self.accumulator.reset();
        self.error = None;
        self.begin_refetch()
    }

    /// Apply several filter changes in order. Only the fetch for the final
    /// selection is returned; every earlier one is already stale.
    pub fn dispatch_all<I>(&mut self, intents: I) -> Option<PendingFetch>
    where
        I: IntoIterator<Item = FilterIntent>,
    {
        let last = intents
            .into_iter()
            .fold(None, |last, intent| self.dispatch(intent).or(last));
        last.filter(|pending| self.current_token == Some(pending.token()))
    }

    /// Issue a page-1 fetch for the current selection.
    pub fn begin_refetch(&mut self) -> Option<PendingFetch> {
        match ProductQuery::from_selection(&self.selection, 1) {
            Some(query) => Some(self.issue(FetchMode::Replace, query)),
            None => {
                debug!("Product fetch suppressed: empty selection");
                self.current_token = None;
                self.in_flight = false;
                None
            }
        }
    }

    /// Issue a fetch for the next page. No-op while a fetch is in flight
    /// or when the last page reported no more results.
    pub fn begin_load_more(&mut self) -> Option<PendingFetch> {
        if self.in_flight {
            debug!("load_more ignored: fetch in flight");
            return None;
        }
        if !self.accumulator.has_more() {
            debug!("load_more ignored: no more pages");
            return None;
        }
        let query = ProductQuery::from_selection(&self.selection, self.accumulator.current_page())?;
        Some(self.issue(FetchMode::Append, query))
    }

    /// Fold a fetch result into the coordinator.
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        result: Result<ProductPage, GraphqlError>,
    ) -> FetchOutcome {
        if self.current_token != Some(pending.token) {
            debug!(token = pending.token, "Discarding stale product response");
            return FetchOutcome::Stale;
        }
        self.current_token = None;
        self.in_flight = false;

        match result {
            Ok(page) => {
                let requested = pending.query.page;
                let added = match pending.mode {
                    FetchMode::Replace => self.accumulator.replace(page, requested),
                    FetchMode::Append => self.accumulator.append(page, requested),
                };
                self.error = None;
                if pending.mode == FetchMode::Append {
                    self.route.page = Some(requested);
                    self.navigator
                        .navigate(Navigation::Replace(self.route.to_url()));
                }
                debug!(
                    page = requested,
                    added,
                    total = self.accumulator.len(),
                    has_more = self.accumulator.has_more(),
                    "Product page applied"
                );
                FetchOutcome::Applied { added }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    error_type = e.error_type(),
                    page = pending.query.page,
                    "Product fetch failed"
                );
                self.error = Some(FetchFailure::from(&e));
                FetchOutcome::Failed
            }
        }
    }

    fn issue(&mut self, mode: FetchMode, query: ProductQuery) -> PendingFetch {
        let token = self.next_token;
        self.next_token += 1;
        self.current_token = Some(token);
        self.in_flight = true;
        debug!(token, page = query.page, ?mode, "Issuing product fetch");
        PendingFetch { token, mode, query }
    }

    /// Under a category route, choosing a different category navigates
    /// to its own route instead of filtering in place.
    fn category_navigation(&self, category: &ActiveCategory) -> Option<Navigation> {
        let current = self.route.category.as_deref()?;
        let same = match &self.route_category {
            Some(resolved) => resolved.same_as(category),
            None => current == category.slug,
        };
        (!same).then(|| Navigation::Push(ShopRoute::category(category.slug.clone()).to_url()))
    }

    // ── async drivers ────────────────────────────────────────────

    /// Run `pending` against the search backend and apply the result.
    pub async fn execute(&mut self, pending: PendingFetch) -> FetchOutcome {
        let result = self.search.search(pending.query()).await;
        self.complete(pending, result)
    }

    async fn run(&mut self, pending: Option<PendingFetch>) -> Option<FetchOutcome> {
        match pending {
            Some(pending) => Some(self.execute(pending).await),
            None => None,
        }
    }

    /// Initial load. When the route carries `page=N`, pages 1 through N
    /// are loaded so the listing is restored to the same depth.
    pub async fn mount(&mut self) -> Option<FetchOutcome> {
        let target_page = self.route.page.unwrap_or(1);
        let pending = self.begin_refetch()?;
        let mut outcome = self.execute(pending).await;
        while matches!(outcome, FetchOutcome::Applied { .. })
            && self.accumulator.has_more()
            && self.accumulator.current_page() <= target_page
        {
            let Some(pending) = self.begin_load_more() else {
                break;
            };
            outcome = self.execute(pending).await;
        }
        Some(outcome)
    }

    pub async fn toggle_facet(&mut self, facet: Facet, id: impl Into<String>) -> Option<FetchOutcome> {
        let pending = self.dispatch(FilterIntent::ToggleFacet {
            facet,
            id: id.into(),
        });
        self.run(pending).await
    }

    /// Select a category by name and id. Its route segment is generated
    /// from the name; use [`select_category`](Self::select_category) with
    /// a category from the backend list to keep its stored slug.
    pub async fn set_active_category(
        &mut self,
        name: impl Into<String>,
        id: i64,
    ) -> Option<Navigation> {
        self.select_category(ActiveCategory::new(name, id)).await
    }

    /// Select a category. Under a category route showing a different
    /// category this only navigates and returns the navigation.
    pub async fn select_category(&mut self, category: ActiveCategory) -> Option<Navigation> {
        if let Some(navigation) = self.category_navigation(&category) {
            self.navigator.navigate(navigation.clone());
            return Some(navigation);
        }
        let pending = self.dispatch(FilterIntent::SetCategory(category));
        self.run(pending).await;
        None
    }

    pub async fn clear_category(&mut self) -> Option<FetchOutcome> {
        let pending = self.dispatch(FilterIntent::ClearCategory);
        self.run(pending).await
    }

    pub async fn set_price_ceiling(&mut self, value: f64) -> Option<FetchOutcome> {
        let pending = self.dispatch(FilterIntent::SetPriceCeiling(value));
        self.run(pending).await
    }

    pub async fn set_search_term(&mut self, term: impl Into<String>) -> Option<FetchOutcome> {
        let pending = self.dispatch(FilterIntent::SetSearchTerm(term.into()));
        self.run(pending).await
    }

    pub async fn set_sort_mode(&mut self, mode: SortMode) -> Option<FetchOutcome> {
        let pending = self.dispatch(FilterIntent::SetSortMode(mode));
        self.run(pending).await
    }

    pub async fn clear_all(&mut self) -> Option<FetchOutcome> {
        let pending = self.dispatch(FilterIntent::ClearAll {
            keep_category: false,
        });
        self.run(pending).await
    }

    /// Re-run page 1 for the current selection. Search results are read
    /// cache-first, so an unchanged selection is answered from the client
    /// cache without a request.
    pub async fn refetch(&mut self) -> Option<FetchOutcome> {
        let pending = self.begin_refetch();
        self.run(pending).await
    }

    pub async fn load_more(&mut self) -> Option<FetchOutcome> {
        let pending = self.begin_load_more();
        self.run(pending).await
    }
}
