//! Page-session shopping cart.
//!
//! The cart is an ordered list of line items. Items keep the position at
//! which their product was first added; quantity changes never reorder them.
//! There is at most one line per product id and no line ever holds a
//! quantity of zero: a line whose quantity would drop to zero is removed.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId, SHIPPING_FEE};

/// One cart line: a product snapshot and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The cart store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem::from_product(product)),
        }
    }

    /// Adjust the quantity of the line for `id` by `delta`.
    ///
    /// Does nothing if there is no such line. Removes the line when the
    /// resulting quantity is zero or less.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return;
        };

        let current = self.items.get(index).map_or(0, |item| i64::from(item.quantity));
        match u32::try_from(current.saturating_add(delta)) {
            Ok(0) | Err(_) => {
                self.items.remove(index);
            }
            Ok(quantity) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = quantity;
                }
            }
        }
    }

    /// Remove the line for `id`, if any. Returns whether a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Shipping charged for the current contents: the flat fee, or nothing
    /// for an empty cart.
    #[must_use]
    pub fn shipping(&self) -> Price {
        if self.is_empty() {
            Price::ZERO
        } else {
            SHIPPING_FEE
        }
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn grand_total(&self) -> Price {
        self.subtotal() + self.shipping()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::Rating;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: format!("https://example.com/{id}.jpg"),
            category: "electronics".to_string(),
            description: String::new(),
            rating: Rating::default(),
        }
    }

    #[test]
    fn test_add_appends_then_increments() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.add(&product(2, 500));
        cart.add(&product(1, 1000));

        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().quantity, 1);
    }

    #[test]
    fn test_change_quantity_updates_in_place() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.add(&product(2, 500));
        cart.change_quantity(ProductId::new(1), 3);

        assert_eq!(cart.items().first().unwrap().quantity, 4);
        assert_eq!(cart.items().first().unwrap().id, ProductId::new(1));
    }

    #[test]
    fn test_decrease_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.change_quantity(ProductId::new(1), -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        let before = cart.clone();
        cart.change_quantity(ProductId::new(99), -1);
        cart.change_quantity(ProductId::new(99), 1);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.add(&product(2, 500));
        assert!(cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(1)));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.total_item_count(), 0);
        assert_eq!(cart.subtotal(), Price::ZERO);
        assert_eq!(cart.shipping(), Price::ZERO);
        assert_eq!(cart.grand_total(), Price::ZERO);
    }

    #[test]
    fn test_totals_with_shipping() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.add(&product(1, 1000));
        cart.add(&product(2, 500));

        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(2500));
        assert_eq!(cart.grand_total(), Price::from_cents(3099));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1000));
        cart.clear();
        assert!(cart.is_empty());
    }

    proptest! {
        #[test]
        fn prop_repeated_adds_count_per_id(ids in proptest::collection::vec(1i64..6, 0..40)) {
            let mut cart = Cart::new();
            for id in &ids {
                cart.add(&product(*id, 100));
            }

            for item in cart.items() {
                let expected = ids.iter().filter(|id| **id == item.id.as_i64()).count();
                prop_assert_eq!(item.quantity as usize, expected);
            }

            let mut distinct = ids.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(cart.items().len(), distinct.len());
        }

        #[test]
        fn prop_subtracting_full_quantity_removes(adds in 1u32..20) {
            let mut cart = Cart::new();
            for _ in 0..adds {
                cart.add(&product(7, 250));
            }
            cart.change_quantity(ProductId::new(7), -i64::from(adds));
            prop_assert!(cart.get(ProductId::new(7)).is_none());
        }

        #[test]
        fn prop_no_line_ever_holds_zero(deltas in proptest::collection::vec(-3i64..4, 0..30)) {
            let mut cart = Cart::new();
            cart.add(&product(1, 100));
            for delta in deltas {
                cart.change_quantity(ProductId::new(1), delta);
                prop_assert!(cart.items().iter().all(|item| item.quantity >= 1));
            }
        }

        #[test]
        fn prop_totals_are_sums(lines in proptest::collection::vec((1i64..10, 1i64..100_000), 0..20)) {
            let mut cart = Cart::new();
            for (id, cents) in &lines {
                cart.add(&product(*id, *cents));
            }

            let expected_subtotal: Price = cart.items().iter().map(|i| i.price.times(i.quantity)).sum();
            let expected_count: u32 = cart.items().iter().map(|i| i.quantity).sum();
            prop_assert_eq!(cart.subtotal(), expected_subtotal);
            prop_assert_eq!(cart.total_item_count(), expected_count);
            prop_assert_eq!(cart.total_item_count() as usize, lines.len());
        }
    }
}
