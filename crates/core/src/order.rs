//! Simulated checkout.
//!
//! Placing an order validates the checkout form, snapshots the cart into an
//! [`Order`] and empties the cart. Nothing is sent anywhere; the storefront
//! only logs the resulting order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::{Cart, CartItem};
use crate::types::{Email, EmailError, Price};

/// Reasons a checkout submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A required field was left blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The email field is filled but not an address.
    #[error("invalid email: {0}")]
    InvalidEmail(EmailError),

    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
}

/// Raw checkout form fields as submitted by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// A placed order. Write-once snapshot of the cart at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl CheckoutForm {
    /// Check that every field is filled in (ignoring surrounding whitespace)
    /// and that the email is well formed.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::MissingField`] for the first blank field in form
    /// order (name, email, address), or [`CheckoutError::InvalidEmail`].
    pub fn validate(&self) -> Result<Email, CheckoutError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(field));
            }
        }

        Email::parse(&self.email).map_err(CheckoutError::InvalidEmail)
    }
}

impl Order {
    /// Place an order for the contents of `cart`.
    ///
    /// On success the cart is emptied. On failure neither the cart nor
    /// anything else is touched.
    ///
    /// # Errors
    ///
    /// Returns the form validation error, or [`CheckoutError::EmptyCart`]
    /// when the form is valid but the cart holds nothing.
    pub fn place(form: &CheckoutForm, cart: &mut Cart) -> Result<Self, CheckoutError> {
        let email = form.validate()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = Self {
            id: Uuid::new_v4(),
            name: form.name.trim().to_owned(),
            email,
            address: form.address.trim().to_owned(),
            items: cart.items().to_vec(),
            subtotal: cart.subtotal(),
            shipping: cart.shipping(),
            total: cart.grand_total(),
            placed_at: Utc::now(),
        };
        cart.clear();

        Ok(order)
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{Product, Rating};
    use crate::types::ProductId;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: String::new(),
            category: "electronics".to_string(),
            description: String::new(),
            rating: Rating::default(),
        }
    }

    fn form(name: &str, email: &str, address: &str) -> CheckoutForm {
        CheckoutForm {
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_empty_name_rejected_and_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        let before = cart.clone();

        let result = Order::place(&form("", "a@b.com", "X"), &mut cart);

        assert_eq!(result, Err(CheckoutError::MissingField("name")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_whitespace_only_field_is_missing() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        let result = Order::place(&form("Ada", "a@b.com", "   "), &mut cart);
        assert_eq!(result, Err(CheckoutError::MissingField("address")));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        let result = Order::place(&form("Ada", "not-an-email", "X"), &mut cart);
        assert!(matches!(result, Err(CheckoutError::InvalidEmail(_))));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut cart = Cart::new();
        let result = Order::place(&form("Ada", "a@b.com", "X"), &mut cart);
        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_full_checkout_scenario() {
        let mut cart = Cart::new();
        let a = product(1, 1000);
        let b = product(2, 500);
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        assert_eq!(cart.subtotal(), Price::from_cents(2500));
        assert_eq!(cart.grand_total(), Price::from_cents(3099));
        assert_eq!(cart.total_item_count(), 3);

        let order = Order::place(&form(" Ada ", "ada@example.com", "1 Main St"), &mut cart).unwrap();

        assert!(cart.is_empty());
        assert_eq!(order.total, Price::from_cents(3099));
        assert_eq!(order.subtotal, Price::from_cents(2500));
        assert_eq!(order.shipping, Price::from_cents(599));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.name, "Ada");
        assert_eq!(order.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_order_serializes_for_logging() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        let order = Order::place(&form("Ada", "a@b.com", "X"), &mut cart).unwrap();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["items"][0]["quantity"], 1);
    }
}
