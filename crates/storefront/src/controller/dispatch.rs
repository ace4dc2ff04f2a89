//! Declarative DOM event dispatch.
//!
//! Interactive elements describe themselves in `hx-vals` (`event`, `target`
//! and, where relevant, a product id or category). The browser posts that
//! description to `/ui/events`; [`resolve`] looks it up in a fixed binding
//! table to obtain the [`Action`] to perform. The table is built once and
//! consulted for every event, so freshly rendered fragments need no wiring.

use emporium_core::{CheckoutForm, ProductId};
use serde::Deserialize;

use super::state::CategoryFilter;

/// DOM event types the storefront listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Click,
    Submit,
    Keypress,
}

/// A DOM event as posted by the browser (form-encoded).
#[derive(Debug, Clone, Deserialize)]
pub struct DomEvent {
    pub event: EventType,
    pub target: String,
    pub id: Option<String>,
    pub category: Option<String>,
    pub key: Option<String>,
    pub term: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl DomEvent {
    /// Event with no payload besides its type and target.
    #[must_use]
    pub fn new(event: EventType, target: &str) -> Self {
        Self {
            event,
            target: target.to_string(),
            id: None,
            category: None,
            key: None,
            term: None,
            name: None,
            email: None,
            address: None,
        }
    }

    fn product_id(&self) -> Option<ProductId> {
        self.id.as_deref()?.parse().ok()
    }

    fn search_term(&self) -> String {
        self.term.clone().unwrap_or_default()
    }

    fn checkout_form(&self) -> CheckoutForm {
        CheckoutForm {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
        }
    }
}

/// What the view controller should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleCart,
    ToggleMenu,
    AddToCart(ProductId),
    /// Add from the detail modal, then close it.
    AddFromDetail(ProductId),
    ViewDetails(ProductId),
    CloseDetail,
    SelectCategory(CategoryFilter),
    Search(String),
    ChangeQuantity { id: ProductId, delta: i64 },
    RemoveItem(ProductId),
    OpenCheckout,
    CloseCheckout,
    PlaceOrder(CheckoutForm),
}

/// One entry of the dispatch table.
struct Binding {
    event: EventType,
    target: &'static str,
    resolve: fn(&DomEvent) -> Option<Action>,
}

const fn bind(
    event: EventType,
    target: &'static str,
    resolve: fn(&DomEvent) -> Option<Action>,
) -> Binding {
    Binding {
        event,
        target,
        resolve,
    }
}

#[allow(clippy::unnecessary_wraps)]
fn toggle_cart(_: &DomEvent) -> Option<Action> {
    Some(Action::ToggleCart)
}

#[allow(clippy::unnecessary_wraps)]
fn toggle_menu(_: &DomEvent) -> Option<Action> {
    Some(Action::ToggleMenu)
}

fn add_to_cart(event: &DomEvent) -> Option<Action> {
    event.product_id().map(Action::AddToCart)
}

fn add_from_detail(event: &DomEvent) -> Option<Action> {
    event.product_id().map(Action::AddFromDetail)
}

fn view_details(event: &DomEvent) -> Option<Action> {
    event.product_id().map(Action::ViewDetails)
}

#[allow(clippy::unnecessary_wraps)]
fn close_detail(_: &DomEvent) -> Option<Action> {
    Some(Action::CloseDetail)
}

fn select_category(event: &DomEvent) -> Option<Action> {
    let value = event.category.as_deref()?;
    Some(Action::SelectCategory(CategoryFilter::parse(value)))
}

#[allow(clippy::unnecessary_wraps)]
fn search(event: &DomEvent) -> Option<Action> {
    Some(Action::Search(event.search_term()))
}

fn search_on_enter(event: &DomEvent) -> Option<Action> {
    (event.key.as_deref() == Some("Enter")).then(|| Action::Search(event.search_term()))
}

fn decrease(event: &DomEvent) -> Option<Action> {
    event
        .product_id()
        .map(|id| Action::ChangeQuantity { id, delta: -1 })
}

fn increase(event: &DomEvent) -> Option<Action> {
    event
        .product_id()
        .map(|id| Action::ChangeQuantity { id, delta: 1 })
}

fn remove_item(event: &DomEvent) -> Option<Action> {
    event.product_id().map(Action::RemoveItem)
}

#[allow(clippy::unnecessary_wraps)]
fn open_checkout(_: &DomEvent) -> Option<Action> {
    Some(Action::OpenCheckout)
}

#[allow(clippy::unnecessary_wraps)]
fn close_checkout(_: &DomEvent) -> Option<Action> {
    Some(Action::CloseCheckout)
}

#[allow(clippy::unnecessary_wraps)]
fn place_order(event: &DomEvent) -> Option<Action> {
    Some(Action::PlaceOrder(event.checkout_form()))
}

static BINDINGS: &[Binding] = &[
    bind(EventType::Click, "cart-link", toggle_cart),
    bind(EventType::Click, "close-cart", toggle_cart),
    bind(EventType::Click, "cart-overlay", toggle_cart),
    bind(EventType::Click, "hamburger", toggle_menu),
    bind(EventType::Click, "add-to-cart", add_to_cart),
    bind(EventType::Click, "modal-add-to-cart", add_from_detail),
    bind(EventType::Click, "view-details", view_details),
    bind(EventType::Click, "close-modal", close_detail),
    bind(EventType::Click, "category-btn", select_category),
    bind(EventType::Click, "search-btn", search),
    bind(EventType::Keypress, "search-input", search_on_enter),
    bind(EventType::Click, "decrease", decrease),
    bind(EventType::Click, "increase", increase),
    bind(EventType::Click, "remove-item", remove_item),
    bind(EventType::Click, "checkout-btn", open_checkout),
    bind(EventType::Click, "close-checkout", close_checkout),
    bind(EventType::Submit, "checkout-form", place_order),
];

/// Resolve a DOM event against the binding table.
///
/// Returns `None` when no binding matches the event type and target, or the
/// matching binding rejects the payload (e.g. a missing product id).
#[must_use]
pub fn resolve(event: &DomEvent) -> Option<Action> {
    BINDINGS
        .iter()
        .find(|binding| binding.event == event.event && binding.target == event.target)
        .and_then(|binding| (binding.resolve)(event))
}
