mod common;

use common::*;
use serde_json::{json, Value};
use std::time::Duration;
use storefront::catalog::facets::{fetch_categories, resolve_category};
use storefront::catalog::filters::{
    ActiveCategory, Facet, FetchOutcome, FilterCoordinator, RecordingNavigator, ShopRoute,
};
use storefront::catalog::{
    FacetKind, FacetLoader, FacetOption, FacetOptionsState, ProductCatalog, ProductRail,
    RailRelation,
};
use storefront::config::CatalogConfig;

fn catalog(mock: &MockGraphql) -> ProductCatalog {
    ProductCatalog::new(client_for(mock), &CatalogConfig::default())
}

fn identifiers(requests: &[CapturedRequest]) -> Vec<String> {
    requests
        .iter()
        .map(|r| r.variables["identifier"].as_str().unwrap_or_default().to_string())
        .collect()
}

// -- Product detail -----------------------------------------------------------

#[tokio::test]
async fn product_lookup_walks_slug_variations() {
    let mock = MockGraphql::start().await;
    for _ in 0..3 {
        mock.enqueue("GetProduct", MockResponse::data("getProduct", Value::Null))
            .await;
    }
    mock.enqueue(
        "GetProduct",
        MockResponse::data(
            "getProduct",
            json!({
                "id": 12,
                "name": "Buzo Frisa",
                "slug": "buzo-frisa",
                "price": 15000.0,
                "quantity": 4,
                "images": [
                    {"id": 1, "imagePath": "b.jpg", "sortOrder": 2, "isMain": false},
                    {"id": 2, "imagePath": "a.jpg", "sortOrder": 1, "isMain": false}
                ]
            }),
        ),
    )
    .await;

    let product = catalog(&mock)
        .product_by_slug("Buzo%20Frisa")
        .await
        .unwrap()
        .expect("last variation matches");

    assert_eq!(product.id, 12);
    assert_eq!(product.quantity, Some(4));
    assert_eq!(product.main_image().map(|i| i.image_path.as_str()), Some("a.jpg"));
    assert_eq!(
        identifiers(&mock.requests_for("GetProduct").await),
        vec!["Buzo%20Frisa", "Buzo Frisa", "buzo20frisa", "buzo-frisa"]
    );
}

#[tokio::test]
async fn product_lookup_stops_at_first_match() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "GetProduct",
        MockResponse::data("getProduct", json!({"id": 3, "name": "Gorro", "price": 10.0})),
    )
    .await;

    let product = catalog(&mock).product_by_slug("Gorro").await.unwrap();

    assert_eq!(product.map(|p| p.id), Some(3));
    assert_eq!(mock.requests_for("GetProduct").await.len(), 1);
}

#[tokio::test]
async fn product_lookup_errors_only_when_nothing_answered() {
    let mock = MockGraphql::start().await;
    mock.enqueue("GetProduct", MockResponse::errors(&["boom"])).await;
    mock.enqueue("GetProduct", MockResponse::data("getProduct", Value::Null))
        .await;
    assert_eq!(catalog(&mock).product_by_slug("Gorro").await.unwrap(), None);

    let mock = MockGraphql::start().await;
    mock.enqueue("GetProduct", MockResponse::errors(&["boom"])).await;
    let err = catalog(&mock).product_by_slug("gorro").await.unwrap_err();
    assert_eq!(err.error_type(), "graphql_error");
}

#[tokio::test]
async fn related_products_degrade_to_empty() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "GetRelatedProducts",
        MockResponse::data("getRelatedProducts", json!([product_json(4), product_json(5)])),
    )
    .await;
    let catalog = catalog(&mock);

    let related = catalog.related_products(12).await;
    assert_eq!(related.iter().map(|p| p.id).collect::<Vec<_>>(), vec![4, 5]);
    let requests = mock.requests_for("GetRelatedProducts").await;
    assert_eq!(requests[0].variables, json!({"productId": 12, "limit": 4}));

    mock.enqueue("GetRelatedProducts", MockResponse::errors(&["down"]))
        .await;
    assert!(catalog.related_products(99).await.is_empty());
}

// -- Home rails ---------------------------------------------------------------

fn rail_json(id: i64, genre: (i64, &str)) -> Value {
    json!({
        "id": id,
        "name": format!("Producto {}", id),
        "price": 500.0,
        "genres": [{"id": genre.0, "genre": genre.1}]
    })
}

#[tokio::test]
async fn genre_rail_loads_first_option_and_switches() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "FindProductsByGenre",
        MockResponse::data("findAllProducts", json!([rail_json(1, (3, "Niña")), rail_json(2, (3, "Niña"))])),
    )
    .await;
    mock.enqueue(
        "FindProductsByGenre",
        MockResponse::data("findAllProducts", json!([rail_json(8, (4, "Niño"))])),
    )
    .await;
    let catalog = catalog(&mock);
    let mut rail = ProductRail::new(RailRelation::Genre);

    assert!(rail.load_first(&catalog, &[3, 4]).await.unwrap());
    assert_eq!(rail.active(), Some(3));
    assert_eq!(rail.products().len(), 2);
    assert_eq!(rail.products()[0].genres[0].genre, "Niña");

    // Already shown: no request.
    assert!(!rail.select(&catalog, 3).await.unwrap());
    assert!(!rail.load_first(&catalog, &[4]).await.unwrap());

    assert!(rail.select(&catalog, 4).await.unwrap());
    assert_eq!(rail.products()[0].id, 8);

    let requests = mock.requests_for("FindProductsByGenre").await;
    let ids: Vec<Value> = requests.iter().map(|r| r.variables.clone()).collect();
    assert_eq!(ids, vec![json!({"id": 3}), json!({"id": 4})]);
}

#[tokio::test]
async fn category_rail_reads_from_cache_when_revisited() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "FindProductsByCategory",
        MockResponse::data(
            "findAllProducts",
            json!([{"id": 5, "name": "Buzo", "price": 900.0, "categories": [{"id": 2, "name": "Buzos"}]}]),
        ),
    )
    .await;
    mock.enqueue(
        "FindProductsByCategory",
        MockResponse::data("findAllProducts", json!([])),
    )
    .await;
    let catalog = catalog(&mock);
    let mut rail = ProductRail::new(RailRelation::Category);

    rail.select(&catalog, 2).await.unwrap();
    rail.select(&catalog, 7).await.unwrap();
    assert!(rail.products().is_empty());
    rail.select(&catalog, 2).await.unwrap();

    assert_eq!(rail.products()[0].categories[0].name, "Buzos");
    assert_eq!(mock.requests_for("FindProductsByCategory").await.len(), 2);
}

#[tokio::test]
async fn failed_rail_load_keeps_previous_products() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "FindProductsByGenre",
        MockResponse::data("findAllProducts", json!([rail_json(1, (3, "Niña"))])),
    )
    .await;
    mock.enqueue("FindProductsByGenre", MockResponse::errors(&["down"]))
        .await;
    let catalog = catalog(&mock);
    let mut rail = ProductRail::new(RailRelation::Genre);

    rail.select(&catalog, 3).await.unwrap();
    assert!(rail.select(&catalog, 4).await.is_err());
    assert_eq!(rail.active(), Some(3));
    assert_eq!(rail.products()[0].id, 1);
}

// -- Facet options ------------------------------------------------------------

#[tokio::test]
async fn facet_lists_map_to_id_label_pairs() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "GetAllSizes",
        MockResponse::data("getAllSizes", json!([{"id": 1, "size": "S"}, {"id": 2, "size": "M"}])),
    )
    .await;
    mock.enqueue(
        "GetAllAges",
        MockResponse::data("getAllAges", json!([{"id": 5, "range": "0-3 meses"}])),
    )
    .await;
    let client = client_for(&mock);
    let loader = FacetLoader::from_config(&CatalogConfig::default());

    let sizes = loader.load_kind(&client, FacetKind::Size).await;
    assert_eq!(
        sizes,
        FacetOptionsState::Ready(vec![
            FacetOption {
                id: "1".to_string(),
                label: "S".to_string(),
            },
            FacetOption {
                id: "2".to_string(),
                label: "M".to_string(),
            },
        ])
    );

    let ages = loader.load_kind(&client, FacetKind::Age).await;
    assert_eq!(ages.options()[0].label, "0-3 meses");
    assert_eq!(FacetKind::Age.facet(), Some(Facet::Age));
}

#[tokio::test]
async fn slow_facet_list_reports_timeout() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "GetAllColors",
        MockResponse::data("getAllColors", json!([{"id": 1, "color": "Rojo"}])).with_delay(500),
    )
    .await;
    let client = client_for(&mock);

    let state = FacetLoader::new(Duration::from_millis(50))
        .load_kind(&client, FacetKind::Color)
        .await;
    assert_eq!(state, FacetOptionsState::TimedOut);
    assert!(state.options().is_empty());

    // The request keeps running and fills the cache once it lands
    tokio::time::sleep(Duration::from_millis(700)).await;
    let state = FacetLoader::new(Duration::from_millis(50))
        .load_kind(&client, FacetKind::Color)
        .await;
    assert_eq!(state.options().len(), 1);
    assert_eq!(mock.requests_for("GetAllColors").await.len(), 1);
}

#[tokio::test]
async fn failed_facet_list_reports_message() {
    let mock = MockGraphql::start().await;
    mock.enqueue("GetAllGenres", MockResponse::errors(&["forbidden"]))
        .await;

    let state = FacetLoader::from_config(&CatalogConfig::default())
        .load_kind(&client_for(&mock), FacetKind::Genre)
        .await;

    match state {
        FacetOptionsState::Failed(message) => assert!(message.contains("forbidden")),
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn route_slug_resolves_against_category_list() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "GetAllCategories",
        MockResponse::data(
            "getAllCategories",
            json!([
                {"id": 3, "name": "Remeras", "slug": "remeras"},
                {"id": 8, "name": "Buzos y Camperas", "slug": null}
            ]),
        ),
    )
    .await;

    let categories = fetch_categories(&client_for(&mock)).await.unwrap();

    assert_eq!(
        resolve_category(&categories, "buzos-y-camperas"),
        Some(ActiveCategory::new("Buzos y Camperas", 8))
    );
    assert_eq!(resolve_category(&categories, "zapatos"), None);
}

// -- Listing over HTTP --------------------------------------------------------

#[tokio::test]
async fn coordinator_drives_backend_search() {
    let mock = MockGraphql::start().await;
    let products: Vec<Value> = (1..=20).map(product_json).collect();
    mock.enqueue(
        "GetProductsByRelation",
        MockResponse::data(
            "findProductsByRelation",
            json!({"products": products, "isProducts": true}),
        ),
    )
    .await;
    mock.enqueue(
        "GetProductsByRelation",
        MockResponse::data(
            "findProductsByRelation",
            json!({"products": [product_json(21)], "isProducts": false}),
        ),
    )
    .await;

    let mut coordinator = FilterCoordinator::new(
        catalog(&mock),
        RecordingNavigator::new(),
        ShopRoute::category("remeras"),
        Some(ActiveCategory::new("Remeras", 3)),
    );

    assert_eq!(
        coordinator.toggle_facet(Facet::Color, "2").await,
        Some(FetchOutcome::Applied { added: 20 })
    );
    assert_eq!(
        coordinator.load_more().await,
        Some(FetchOutcome::Applied { added: 1 })
    );
    assert!(!coordinator.accumulator().has_more());

    let requests = mock.requests_for("GetProductsByRelation").await;
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].variables,
        json!({
            "filterData": [
                {"key": "colorId", "ids": [2]},
                {"key": "categoryId", "ids": [3]}
            ],
            "page": 2,
            "sortBy": "newest"
        })
    );
}

#[tokio::test]
async fn refetch_of_unchanged_selection_reads_cached_page() {
    let mock = MockGraphql::start().await;
    mock.enqueue(
        "GetProductsByRelation",
        MockResponse::data(
            "findProductsByRelation",
            json!({"products": [product_json(1), product_json(2)], "isProducts": false}),
        ),
    )
    .await;

    let mut coordinator = FilterCoordinator::new(
        catalog(&mock),
        RecordingNavigator::new(),
        ShopRoute::category("remeras"),
        Some(ActiveCategory::new("Remeras", 3)),
    );

    assert_eq!(coordinator.refetch().await, Some(FetchOutcome::Applied { added: 2 }));
    assert_eq!(coordinator.refetch().await, Some(FetchOutcome::Applied { added: 2 }));
    assert_eq!(coordinator.accumulator().len(), 2);
    assert_eq!(mock.requests_for("GetProductsByRelation").await.len(), 1);
}
