//! Integration tests for the catalog REST client against an in-process mock.
//!
//! Run with: cargo test -p emporium-integration-tests

use emporium_core::{Price, ProductId};
use emporium_integration_tests::{BACKPACK_ID, MockCatalog, RING_ID, TEE_ID, catalog_config};
use emporium_storefront::catalog::{CatalogClient, CatalogError};

async fn client() -> (MockCatalog, CatalogClient) {
    let catalog = MockCatalog::start().await;
    let client = CatalogClient::new(&catalog_config(&catalog));
    (catalog, client)
}

#[tokio::test]
async fn test_fetch_all_preserves_order() {
    let (_catalog, client) = client().await;

    let products = client.fetch_all().await.expect("fetch_all");
    let ids: Vec<i64> = products.iter().map(|p| p.id.as_i64()).collect();
    assert_eq!(ids, vec![BACKPACK_ID, TEE_ID, RING_ID]);

    let backpack = &products[0];
    assert_eq!(backpack.price, Price::from_cents(1000));
    assert_eq!(backpack.rating.count, 120);
    assert!((backpack.rating.rate - 3.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_fetch_by_category_encodes_spaces_and_quotes() {
    let (_catalog, client) = client().await;

    let products = client
        .fetch_by_category("men's clothing")
        .await
        .expect("fetch_by_category");
    let ids: Vec<i64> = products.iter().map(|p| p.id.as_i64()).collect();
    assert_eq!(ids, vec![BACKPACK_ID, TEE_ID]);
}

#[tokio::test]
async fn test_fetch_by_unknown_category_is_empty() {
    let (_catalog, client) = client().await;

    let products = client.fetch_by_category("books").await.expect("fetch_by_category");
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_fetch_one() {
    let (_catalog, client) = client().await;

    let ring = client.fetch_one(ProductId::new(RING_ID)).await.expect("fetch_one");
    assert_eq!(ring.title, "Silver Dragon Ring");
    assert_eq!(ring.price, Price::from_cents(69_500));
}

#[tokio::test]
async fn test_fetch_one_empty_body_is_not_found() {
    let (_catalog, client) = client().await;

    let err = client
        .fetch_one(ProductId::new(999))
        .await
        .expect_err("unknown id");
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let (catalog, client) = client().await;
    catalog.set_failing(true);

    let err = client.fetch_all().await.expect_err("500");
    assert!(matches!(err, CatalogError::Status { .. }), "{err}");
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (catalog, client) = client().await;
    catalog.set_malformed(true);

    let err = client.fetch_all().await.expect_err("not json");
    assert!(matches!(err, CatalogError::Parse(_)), "{err}");
}

#[tokio::test]
async fn test_unreachable_api_is_http_error() {
    let (catalog, _client) = client().await;
    let mut config = catalog_config(&catalog);
    config.base_url = url::Url::parse("http://127.0.0.1:9/").expect("url");
    let client = CatalogClient::new(&config);

    let err = client.fetch_all().await.expect_err("connection refused");
    assert!(matches!(err, CatalogError::Http(_)), "{err}");
}

#[tokio::test]
async fn test_search_matches_title_description_and_category() {
    let (_catalog, client) = client().await;

    let by_title = client.search("backpack").await.expect("search");
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, ProductId::new(BACKPACK_ID));

    let by_description = client.search("LOVE").await.expect("search");
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].id, ProductId::new(RING_ID));

    let by_category = client.search("clothing").await.expect("search");
    assert_eq!(by_category.len(), 2);
}

#[tokio::test]
async fn test_search_without_match_is_empty_not_error() {
    let (_catalog, client) = client().await;

    let products = client.search("xyzzy").await.expect("search");
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_search_propagates_fetch_failure() {
    let (catalog, client) = client().await;
    catalog.set_failing(true);

    assert!(client.search("ring").await.is_err());
}
