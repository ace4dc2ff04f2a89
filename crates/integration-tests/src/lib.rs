//! Integration tests for the Emporium storefront.
//!
//! The tests run entirely in-process: [`MockCatalog`] stands in for the
//! remote catalog REST API and [`TestStorefront`] serves the storefront
//! router on a random local port, pointed at the mock.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use emporium_storefront::config::{CatalogConfig, StorefrontConfig};
use emporium_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Product A of the checkout scenario: 10.00.
pub const BACKPACK_ID: i64 = 1;
/// Product B of the checkout scenario: 5.00.
pub const TEE_ID: i64 = 2;
/// A third product, only reachable by category or search.
pub const RING_ID: i64 = 3;

/// Catalog served by [`MockCatalog::start`].
#[must_use]
pub fn fixture_products() -> Vec<Value> {
    vec![
        json!({
            "id": BACKPACK_ID,
            "title": "Fjallraven Foldsack No. 1 Backpack",
            "price": 10.0,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://images.example.com/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }),
        json!({
            "id": TEE_ID,
            "title": "Slim Fit Tee",
            "price": 5.0,
            "description": "Soft cotton",
            "category": "men's clothing",
            "image": "https://images.example.com/2.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        }),
        json!({
            "id": RING_ID,
            "title": "Silver Dragon Ring",
            "price": 695,
            "description": "Wear facing inward to be bestowed with love",
            "category": "jewelery",
            "image": "https://images.example.com/3.jpg",
            "rating": { "rate": 4.6, "count": 400 }
        }),
    ]
}

#[derive(Default)]
struct MockCatalogState {
    products: Vec<Value>,
    failing: AtomicBool,
    malformed: AtomicBool,
}

/// In-process mock of the catalog REST API.
///
/// Unknown product ids are answered with `200` and an empty body, the way
/// the public API does.
pub struct MockCatalog {
    state: Arc<MockCatalogState>,
    _handle: JoinHandle<()>,
    addr: SocketAddr,
}

impl MockCatalog {
    /// Start a mock serving [`fixture_products`] on a random port.
    pub async fn start() -> Self {
        Self::start_with(fixture_products()).await
    }

    /// Start a mock serving `products`.
    pub async fn start_with(products: Vec<Value>) -> Self {
        let state = Arc::new(MockCatalogState {
            products,
            ..MockCatalogState::default()
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalog");
        let addr = listener.local_addr().expect("Failed to get local address");

        let app = Router::new()
            .route("/products", get(handle_all))
            .route("/products/{id}", get(handle_one))
            .route("/products/category/{category}", get(handle_category))
            .with_state(Arc::clone(&state));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock catalog failed");
        });

        Self {
            state,
            _handle: handle,
            addr,
        }
    }

    /// API root, e.g. `http://127.0.0.1:PORT/`.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Invalid mock URL")
    }

    /// Answer every request with `500` while `failing` is set.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Answer every request with a body that is not JSON while set.
    pub fn set_malformed(&self, malformed: bool) {
        self.state.malformed.store(malformed, Ordering::SeqCst);
    }
}

impl MockCatalogState {
    fn respond(&self, body: impl FnOnce(&[Value]) -> Response) -> Response {
        if self.failing.load(Ordering::SeqCst) {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        if self.malformed.load(Ordering::SeqCst) {
            return (StatusCode::OK, "<html>not json</html>").into_response();
        }
        body(&self.products)
    }
}

async fn handle_all(State(state): State<Arc<MockCatalogState>>) -> Response {
    state.respond(|products| Json(products.to_vec()).into_response())
}

async fn handle_one(
    State(state): State<Arc<MockCatalogState>>,
    Path(id): Path<i64>,
) -> Response {
    state.respond(|products| {
        products
            .iter()
            .find(|p| p["id"].as_i64() == Some(id))
            .map_or_else(
                || StatusCode::OK.into_response(),
                |p| Json(p.clone()).into_response(),
            )
    })
}

async fn handle_category(
    State(state): State<Arc<MockCatalogState>>,
    Path(category): Path<String>,
) -> Response {
    state.respond(|products| {
        let matching: Vec<Value> = products
            .iter()
            .filter(|p| p["category"].as_str() == Some(category.as_str()))
            .cloned()
            .collect();
        Json(matching).into_response()
    })
}

/// Catalog settings pointing at `catalog`.
#[must_use]
pub fn catalog_config(catalog: &MockCatalog) -> CatalogConfig {
    CatalogConfig::with_base_url(catalog.base_url())
}

/// The storefront served on a random local port.
pub struct TestStorefront {
    _handle: JoinHandle<()>,
    addr: SocketAddr,
    /// Client that keeps the session cookie, like a browser tab.
    pub client: reqwest::Client,
}

impl TestStorefront {
    /// Start the storefront against `catalog`.
    pub async fn start(catalog: &MockCatalog) -> Self {
        let config = StorefrontConfig::local(catalog_config(catalog));
        let app = emporium_storefront::app(AppState::new(config));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Storefront server failed");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            _handle: handle,
            addr,
            client,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Load the page, starting a fresh page session.
    pub async fn load_page(&self) -> String {
        let resp = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .expect("Failed to load page");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        resp.text().await.expect("Failed to read page")
    }

    /// Post a DOM event and return the status and response body.
    pub async fn event(&self, fields: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .post(self.url("/ui/events"))
            .form(fields)
            .send()
            .await
            .expect("Failed to post event");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read response"))
    }

    /// Click an element bound to a product.
    pub async fn click_product(&self, target: &str, id: i64) -> String {
        let id = id.to_string();
        let (status, body) = self
            .event(&[("event", "click"), ("target", target), ("id", &id)])
            .await;
        assert_eq!(status, reqwest::StatusCode::OK, "{target} {id}: {body}");
        body
    }
}
