//! Catalog products.
//!
//! These types mirror the JSON documents served by the catalog API:
//!
//! ```json
//! {
//!   "id": 1,
//!   "title": "Fjallraven - Foldsack No. 1 Backpack",
//!   "price": 109.95,
//!   "description": "Your perfect pack for everyday use",
//!   "category": "men's clothing",
//!   "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
//!   "rating": { "rate": 3.9, "count": 120 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as listed in the remote catalog. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: Rating,
}

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of reviews.
    pub count: u32,
}

impl Product {
    /// Case-insensitive substring match against title, description and
    /// category.
    ///
    /// `needle` must already be lowercased; callers lowercase the search term
    /// once rather than once per product.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.title, &self.description, &self.category]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn backpack() -> Product {
        Product {
            id: ProductId::new(1),
            title: "Fjallraven Backpack".to_string(),
            price: Price::from_cents(10995),
            image: "https://example.com/bag.jpg".to_string(),
            category: "men's clothing".to_string(),
            description: "Your perfect pack for everyday use".to_string(),
            rating: Rating {
                rate: 3.9,
                count: 120,
            },
        }
    }

    #[test]
    fn test_deserialize_catalog_document() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://example.com/bag.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product, backpack());
    }

    #[test]
    fn test_missing_rating_defaults_to_zero() {
        let json = r#"{"id": 2, "title": "T", "price": 1, "category": "c", "image": "i"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.rating, Rating::default());
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_matches_title_description_and_category() {
        let product = backpack();
        assert!(product.matches_lowercase("fjall"));
        assert!(product.matches_lowercase("everyday"));
        assert!(product.matches_lowercase("men's"));
        assert!(!product.matches_lowercase("jewel"));
    }
}
