//! Tests for the shop listing filter and pagination coordinator.

mod common;

use common::*;
use storefront::catalog::filters::{
    ActiveCategory, Facet, FetchOutcome, FilterCoordinator, FilterIntent, FilterSelection,
    Navigation, PageAccumulator, RecordingNavigator, ShopRoute, SortMode,
};
use storefront::catalog::Category;
use storefront::graphql::GraphqlError;

fn remeras() -> Option<ActiveCategory> {
    Some(ActiveCategory::new("Remeras", 3))
}

fn scoped(search: &ScriptedSearch) -> (FilterCoordinator<ScriptedSearch, RecordingNavigator>, RecordingNavigator) {
    let navigator = RecordingNavigator::new();
    let coordinator = FilterCoordinator::new(
        search.clone(),
        navigator.clone(),
        ShopRoute::category("remeras"),
        remeras(),
    );
    (coordinator, navigator)
}

fn unscoped(
    search: &ScriptedSearch,
    route: ShopRoute,
) -> (FilterCoordinator<ScriptedSearch, RecordingNavigator>, RecordingNavigator) {
    let navigator = RecordingNavigator::new();
    let coordinator = FilterCoordinator::new(search.clone(), navigator.clone(), route, None);
    (coordinator, navigator)
}

// -- Pagination ---------------------------------------------------------------

#[tokio::test]
async fn load_more_accumulates_until_last_page() {
    let search = ScriptedSearch::new();
    search.push(Ok(page(1..=20, true))).await;
    search.push(Ok(page(21..=25, false))).await;
    let (mut c, navigator) = scoped(&search);

    assert!(c.accumulator().is_empty());
    assert!(c.accumulator().has_more());

    assert_eq!(c.load_more().await, Some(FetchOutcome::Applied { added: 20 }));
    assert_eq!(c.accumulator().len(), 20);
    assert_eq!(c.accumulator().current_page(), 2);
    assert!(c.accumulator().has_more());

    assert_eq!(c.load_more().await, Some(FetchOutcome::Applied { added: 5 }));
    assert_eq!(c.accumulator().len(), 25);
    assert_eq!(c.accumulator().current_page(), 3);
    assert!(!c.accumulator().has_more());

    // Nothing left to load
    assert_eq!(c.load_more().await, None);

    let pages: Vec<u32> = search.queries().await.iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2]);
    assert_eq!(
        navigator.last(),
        Some(Navigation::Replace("/shop/remeras?page=2".to_string()))
    );
}

#[tokio::test]
async fn load_more_is_ignored_while_fetch_pending() {
    let search = ScriptedSearch::new();
    let (mut c, _) = scoped(&search);

    let pending = c.begin_refetch().expect("category scope allows a fetch");
    assert!(c.is_loading());
    assert!(c.begin_load_more().is_none());
    assert_eq!(c.load_more().await, None);

    c.complete(pending, Ok(page(1..=20, true)));
    assert!(!c.is_loading());
    assert!(c.begin_load_more().is_some());
}

#[tokio::test]
async fn overlapping_pages_do_not_duplicate_products() {
    let search = ScriptedSearch::new();
    search.push(Ok(page(1..=20, true))).await;
    search.push(Ok(page(15..=30, false))).await;
    let (mut c, _) = scoped(&search);

    c.refetch().await;
    assert_eq!(c.load_more().await, Some(FetchOutcome::Applied { added: 10 }));

    let mut ids: Vec<i64> = c.accumulator().products().iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 30);
    ids.dedup();
    assert_eq!(ids.len(), 30);
}

#[tokio::test]
async fn failed_fetch_records_error_and_keeps_products() {
    let search = ScriptedSearch::new();
    search.push(Ok(page(1..=20, true))).await;
    search.push(Err(GraphqlError::Timeout { duration: 30 })).await;
    let (mut c, _) = scoped(&search);

    c.refetch().await;
    assert_eq!(c.load_more().await, Some(FetchOutcome::Failed));

    assert_eq!(c.accumulator().len(), 20);
    assert_eq!(c.error().map(|e| e.error_type), Some("request_timeout"));
    assert!(!c.is_loading());
}

#[tokio::test]
async fn mount_restores_page_depth_from_route() {
    let search = ScriptedSearch::new();
    search.push(Ok(page(1..=20, true))).await;
    search.push(Ok(page(21..=40, true))).await;
    search.push(Ok(page(41..=60, true))).await;

    let route = ShopRoute::parse("/shop/remeras?page=3").unwrap();
    let mut c = FilterCoordinator::new(search.clone(), RecordingNavigator::new(), route, remeras());

    assert!(c.mount().await.is_some());
    assert_eq!(c.accumulator().len(), 60);
    assert_eq!(c.accumulator().current_page(), 4);
    assert_eq!(c.route().page, Some(3));

    let pages: Vec<u32> = search.queries().await.iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
}

// -- Filter changes -----------------------------------------------------------

#[tokio::test]
async fn filter_change_resets_accumulator_before_fetch() {
    let search = ScriptedSearch::new();
    search.push(Ok(page(1..=20, true))).await;
    search.push(Ok(page(21..=40, true))).await;
    let (mut c, _) = scoped(&search);

    c.refetch().await;
    c.load_more().await;
    assert_eq!(c.accumulator().len(), 40);

    let pending = c
        .dispatch(FilterIntent::ToggleFacet {
            facet: Facet::Color,
            id: "4".to_string(),
        })
        .expect("facet change refetches");

    assert_eq!(c.accumulator(), &PageAccumulator::default());
    assert_eq!(pending.query().page, 1);
    let keys: Vec<&str> = pending
        .query()
        .filter_data
        .iter()
        .map(|d| d.key.as_str())
        .collect();
    assert_eq!(keys, vec!["colorId", "categoryId"]);
}

#[tokio::test]
async fn stale_response_never_touches_accumulator() {
    let search = ScriptedSearch::new();
    search.push(Ok(page(100..=101, false))).await;
    let (mut c, _) = scoped(&search);

    let older = c.dispatch(FilterIntent::SetSortMode(SortMode::PriceAsc)).unwrap();
    let newer = c.dispatch(FilterIntent::SetSortMode(SortMode::PriceDesc)).unwrap();

    assert_eq!(c.execute(newer).await, FetchOutcome::Applied { added: 2 });
    assert_eq!(c.complete(older, Ok(page(1..=20, true))), FetchOutcome::Stale);

    let ids: Vec<i64> = c.accumulator().products().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![100, 101]);
    assert!(!c.accumulator().has_more());
}

#[tokio::test]
async fn batched_changes_fetch_only_the_final_selection() {
    let search = ScriptedSearch::new();
    search.push(Ok(page(7..=8, false))).await;
    let (mut c, _) = scoped(&search);

    let pending = c
        .dispatch_all([
            FilterIntent::ToggleFacet {
                facet: Facet::Color,
                id: "4".to_string(),
            },
            FilterIntent::SetPriceCeiling(3000.0),
            FilterIntent::SetSortMode(SortMode::PriceAsc),
            // Unchanged selection: keeps the previous fetch.
            FilterIntent::SetSortMode(SortMode::PriceAsc),
        ])
        .expect("final selection is searchable");
    assert_eq!(c.execute(pending).await, FetchOutcome::Applied { added: 2 });

    let queries = search.queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].max_price, Some(3000.0));
    assert_eq!(queries[0].sort_by, SortMode::PriceAsc);
    assert_eq!(queries[0].filter_data[0].ids, vec![4]);
}

#[tokio::test]
async fn batch_ending_in_empty_selection_fetches_nothing() {
    let search = ScriptedSearch::new();
    let (mut c, _) = unscoped(&search, ShopRoute::shop());

    let pending = c.dispatch_all([
        FilterIntent::ToggleFacet {
            facet: Facet::Size,
            id: "2".to_string(),
        },
        FilterIntent::ToggleFacet {
            facet: Facet::Size,
            id: "2".to_string(),
        },
    ]);
    assert!(pending.is_none());
    assert!(!c.is_loading());
}

#[tokio::test]
async fn search_term_pushes_url_and_queries_trimmed_term() {
    let search = ScriptedSearch::new();
    let (mut c, navigator) = unscoped(&search, ShopRoute::shop());

    c.set_search_term("  gorro azul ").await;

    assert_eq!(
        navigator.last(),
        Some(Navigation::Push("/shop?search=gorro+azul".to_string()))
    );
    let queries = search.queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].search_term.as_deref(), Some("gorro azul"));
    assert!(queries[0].filter_data.is_empty());
}

#[tokio::test]
async fn empty_selection_suppresses_fetch() {
    let search = ScriptedSearch::new();
    let (mut c, _) = unscoped(&search, ShopRoute::shop());

    assert_eq!(c.refetch().await, None);
    assert_eq!(c.set_price_ceiling(5000.0).await, None);
    assert!(search.queries().await.is_empty());
    assert!(!c.is_loading());
}

#[tokio::test]
async fn price_ceiling_is_sent_only_when_positive() {
    let search = ScriptedSearch::new();
    let (mut c, _) = scoped(&search);

    c.set_price_ceiling(2500.0).await;
    c.set_price_ceiling(0.0).await;

    let queries = search.queries().await;
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].max_price, Some(2500.0));
    assert_eq!(queries[1].max_price, None);
}

// -- Categories ---------------------------------------------------------------

#[tokio::test]
async fn other_category_under_category_route_only_navigates() {
    let search = ScriptedSearch::new();
    let (mut c, navigator) = scoped(&search);

    let navigation = c.set_active_category("Buzos", 8).await;

    assert_eq!(navigation, Some(Navigation::Push("/shop/buzos".to_string())));
    assert_eq!(navigator.last(), navigation);
    assert_eq!(c.selection().category, remeras());
    assert!(search.queries().await.is_empty());
}

fn stored_category(id: i64, name: &str, slug: &str) -> ActiveCategory {
    ActiveCategory::from(&Category {
        id,
        name: name.to_string(),
        slug: Some(slug.to_string()),
        meta_title: None,
        meta_description: None,
        meta_keywords: None,
    })
}

#[tokio::test]
async fn current_category_with_stored_slug_does_not_navigate() {
    let search = ScriptedSearch::new();
    let navigator = RecordingNavigator::new();
    let ninos = stored_category(2, "Ropa Niños", "ninos");
    let mut c = FilterCoordinator::new(
        search.clone(),
        navigator.clone(),
        ShopRoute::category("ninos"),
        Some(ninos.clone()),
    );

    assert_eq!(c.set_active_category("Ropa Niños", 2).await, None);

    assert!(navigator.history().is_empty());
    assert_eq!(c.selection().category, Some(ninos));
    assert!(search.queries().await.is_empty());
}

#[tokio::test]
async fn other_category_navigates_to_its_stored_slug() {
    let search = ScriptedSearch::new();
    let (mut c, navigator) = scoped(&search);

    let navigation = c
        .select_category(stored_category(9, "Ropa Niños", "ninos"))
        .await;

    assert_eq!(navigation, Some(Navigation::Push("/shop/ninos".to_string())));
    assert_eq!(navigator.history().len(), 1);
    assert!(search.queries().await.is_empty());
}

#[tokio::test]
async fn category_on_plain_shop_route_filters_in_place() {
    let search = ScriptedSearch::new();
    let (mut c, navigator) = unscoped(&search, ShopRoute::shop());

    assert_eq!(c.set_active_category("Buzos", 8).await, None);

    assert_eq!(c.selection().category, Some(ActiveCategory::new("Buzos", 8)));
    let queries = search.queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].filter_data.last().map(|d| d.ids.clone()), Some(vec![8]));
    assert!(navigator.history().is_empty());
}

// -- Clearing -----------------------------------------------------------------

#[tokio::test]
async fn clear_all_returns_to_initial_state() {
    let search = ScriptedSearch::new();
    let (mut c, navigator) = unscoped(&search, ShopRoute::parse("/shop?search=buzo").unwrap());
    assert_eq!(c.selection().search_term, "buzo");

    c.toggle_facet(Facet::Size, "2").await;
    c.set_price_ceiling(500.0).await;
    c.set_sort_mode(SortMode::PriceDesc).await;
    c.set_active_category("Buzos", 8).await;

    assert_eq!(c.clear_all().await, None);

    assert_eq!(c.selection(), &FilterSelection::default());
    assert_eq!(c.accumulator(), &PageAccumulator::default());
    assert_eq!(c.route(), &ShopRoute::shop());
    assert_eq!(navigator.last(), Some(Navigation::Replace("/shop".to_string())));
}

#[tokio::test]
async fn clear_all_keeps_route_category() {
    let search = ScriptedSearch::new();
    let (mut c, _) = scoped(&search);

    c.toggle_facet(Facet::Genre, "1").await;
    assert!(c.clear_all().await.is_some());

    assert_eq!(c.selection().category, remeras());
    assert!(c.selection().genres.is_empty());

    let queries = search.queries().await;
    let last = queries.last().unwrap();
    assert_eq!(last.filter_data.len(), 1);
    assert_eq!(last.filter_data[0].key, "categoryId");
}
