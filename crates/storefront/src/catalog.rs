//! Catalog REST API client.
//!
//! # Endpoints
//!
//! ```text
//! GET /products                     - full catalog
//! GET /products/{id}                - one product
//! GET /products/category/{category} - catalog filtered server-side
//! ```
//!
//! Every call is a single GET: no retries, no timeouts beyond the transport
//! defaults, no caching. Failures are logged here and returned to the caller,
//! which turns them into a fixed message on the page.
//!
//! # Example
//!
//! ```rust,ignore
//! use emporium_storefront::catalog::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.catalog);
//! let products = catalog.fetch_by_category("electronics").await?;
//! let hits = catalog.search("backpack").await?;
//! ```

use std::sync::Arc;

use emporium_core::{Product, ProductId};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::CatalogConfig;

/// Errors returned by the catalog API client.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// The body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product with this id.
    #[error("product {0} not found")]
    NotFound(ProductId),
}

impl CatalogError {
    /// Whether this is a missing product rather than a transport failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Client for the catalog REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the configured API root.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Fetch the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, non-2xx status or malformed JSON.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.get_json::<Vec<Product>>("products").await
    }

    /// Fetch the products of one category, filtered by the API.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, non-2xx status or malformed JSON.
    #[instrument(skip(self))]
    pub async fn fetch_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let path = format!("products/category/{}", urlencoding::encode(category));
        self.get_json::<Vec<Product>>(&path).await
    }

    /// Fetch a single product.
    ///
    /// The public API answers unknown ids with `200` and an empty body, so an
    /// empty or `null` body is treated the same as a `404`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for unknown ids, otherwise the same
    /// failures as [`Self::fetch_all`].
    #[instrument(skip(self))]
    pub async fn fetch_one(&self, id: ProductId) -> Result<Product, CatalogError> {
        let path = format!("products/{id}");
        match self.get_json::<Option<Product>>(&path).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(CatalogError::NotFound(id)),
            Err(CatalogError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(CatalogError::NotFound(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Search the catalog for `term`.
    ///
    /// Fetches the full catalog and keeps the products whose title,
    /// description or category contains `term`, ignoring case. No match is an
    /// empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns the [`Self::fetch_all`] error if the catalog cannot be loaded.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, CatalogError> {
        let products = self.fetch_all().await?;
        Ok(filter_products(products, term))
    }

    /// GET `path` relative to the API root and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.endpoint(path);

        let response = match self.inner.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, url = %url, "Catalog request failed");
                return Err(CatalogError::Http(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, url = %url, "Catalog returned non-success status");
            return Err(CatalogError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };

        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}/{path}"));
        url
    }
}

/// Keep the products matching `term` case-insensitively, preserving order.
///
/// A blank term keeps everything.
#[must_use]
pub fn filter_products(products: Vec<Product>, term: &str) -> Vec<Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products;
    }
    products
        .into_iter()
        .filter(|product| product.matches_lowercase(&needle))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use emporium_core::{Price, Rating};

    use super::*;

    fn product(id: i64, title: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(1000),
            image: String::new(),
            category: category.to_string(),
            description: format!("A fine {}", title.to_lowercase()),
            rating: Rating::default(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Backpack", "men's clothing"),
            product(2, "Gold Ring", "jewelery"),
            product(3, "SSD Drive", "electronics"),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let hits = filter_products(catalog(), "RING");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().unwrap().id, ProductId::new(2));
    }

    #[test]
    fn test_filter_matches_category() {
        let hits = filter_products(catalog(), "electro");
        assert_eq!(hits.first().unwrap().title, "SSD Drive");
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        assert!(filter_products(catalog(), "zeppelin").is_empty());
    }

    #[test]
    fn test_filter_blank_keeps_all() {
        assert_eq!(filter_products(catalog(), "  ").len(), 3);
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = CatalogConfig::with_base_url(Url::parse("https://api.example.com/v1/").unwrap());
        let client = CatalogClient::new(&config);
        assert_eq!(
            client.endpoint("products/3").as_str(),
            "https://api.example.com/v1/products/3"
        );
    }

    #[test]
    fn test_endpoint_keeps_encoded_category() {
        let config = CatalogConfig::with_base_url(Url::parse("https://api.example.com").unwrap());
        let client = CatalogClient::new(&config);
        let path = format!("products/category/{}", urlencoding::encode("men's clothing"));
        assert_eq!(
            client.endpoint(&path).as_str(),
            "https://api.example.com/products/category/men%27s%20clothing"
        );
    }

    #[test]
    fn test_not_found_helper() {
        assert!(CatalogError::NotFound(ProductId::new(1)).is_not_found());
    }
}
