//! HTML fragment rendering.
//!
//! Every function here is a pure mapping from data to markup. Each fragment
//! owns one DOM region (identified by its element id) and can be placed
//! either inline, as part of the full page, or out-of-band, as part of an
//! HTMX event response that swaps several regions at once.
//!
//! Interactive elements carry their DOM event description in `hx-vals`;
//! see [`crate::controller::dispatch`] for how those are resolved.

pub mod stars;

use askama::Template;
use askama_web::WebTemplate;
use emporium_core::{Cart, CartItem, Product, ProductId};
use serde_json::json;

use crate::controller::CategoryFilter;
use crate::filters;

pub use stars::StarRating;

/// Delay before a notification fades in.
pub const NOTIFICATION_SHOW_DELAY_MS: u32 = 10;
/// How long a notification stays visible.
pub const NOTIFICATION_VISIBLE_MS: u32 = 3000;
/// Length of the fade-out before the notification is removed.
pub const NOTIFICATION_HIDE_MS: u32 = 300;

pub const MSG_LOAD_FAILED: &str = "Failed to load products. Please try again later.";
pub const MSG_SEARCH_FAILED: &str = "Failed to search products. Please try again later.";
pub const MSG_NO_MATCHES: &str = "No products found matching your search.";
pub const MSG_EMPTY_CART: &str = "Your cart is empty";

/// Where a fragment goes in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Part of the full page.
    Inline,
    /// Swapped into the existing page by id (`hx-swap-oob`).
    OutOfBand,
}

impl Placement {
    const fn is_oob(self) -> bool {
        matches!(self, Self::OutOfBand)
    }
}

/// What the product grid shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductListing {
    /// Product cards (possibly none, for an empty category).
    Products(Vec<Product>),
    /// A search matched nothing.
    NoMatches,
    /// The catalog could not be loaded.
    LoadFailed,
    /// The catalog could not be loaded for a search.
    SearchFailed,
}

// =============================================================================
// View Models
// =============================================================================

/// `hx-vals` payload for a click on an element bound to a product.
fn product_click_vals(target: &str, id: ProductId) -> String {
    json!({ "event": "click", "target": target, "id": id.to_string() }).to_string()
}

struct ProductCardView {
    id: ProductId,
    title: String,
    image: String,
    category: String,
    description: String,
    price: String,
    glyphs: Vec<&'static str>,
    rating_count: u32,
    add_vals: String,
    details_vals: String,
    modal_add_vals: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            glyphs: StarRating::from_rate(product.rating.rate).glyphs(),
            rating_count: product.rating.count,
            add_vals: product_click_vals("add-to-cart", product.id),
            details_vals: product_click_vals("view-details", product.id),
            modal_add_vals: product_click_vals("modal-add-to-cart", product.id),
        }
    }
}

struct CartLineView {
    title: String,
    image: String,
    quantity: u32,
    line_price: String,
    decrease_vals: String,
    increase_vals: String,
    remove_vals: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            title: item.title.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            line_price: item.line_total().to_string(),
            decrease_vals: product_click_vals("decrease", item.id),
            increase_vals: product_click_vals("increase", item.id),
            remove_vals: product_click_vals("remove-item", item.id),
        }
    }
}

struct CategoryButtonView {
    label: String,
    active: bool,
    vals: String,
}

impl CategoryButtonView {
    fn new(label: &str, value: &str, active: bool) -> Self {
        Self {
            label: label.to_string(),
            active,
            vals: json!({ "event": "click", "target": "category-btn", "category": value })
                .to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "partials/product_grid.html")]
struct ProductGridTemplate<'a> {
    cards: Vec<ProductCardView>,
    message: Option<&'a str>,
    oob: bool,
}

#[derive(Template)]
#[template(path = "partials/stars.html")]
struct StarsTemplate {
    glyphs: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "partials/cart_panel.html")]
struct CartPanelTemplate {
    open: bool,
    lines: Vec<CartLineView>,
    subtotal: String,
    shipping: String,
    grand_total: String,
    oob: bool,
}

#[derive(Template)]
#[template(path = "partials/cart_count.html")]
struct CartCountTemplate {
    count: u32,
    oob: bool,
}

#[derive(Template)]
#[template(path = "partials/product_modal.html")]
struct ProductModalTemplate {
    product: Option<ProductCardView>,
    oob: bool,
}

#[derive(Template)]
#[template(path = "partials/checkout_modal.html")]
struct CheckoutModalTemplate {
    open: bool,
    lines: Vec<CartLineView>,
    total: String,
    oob: bool,
}

#[derive(Template)]
#[template(path = "partials/category_bar.html")]
struct CategoryBarTemplate {
    buttons: Vec<CategoryButtonView>,
    oob: bool,
}

#[derive(Template)]
#[template(path = "partials/nav_links.html")]
struct NavLinksTemplate {
    open: bool,
    oob: bool,
}

#[derive(Template)]
#[template(path = "partials/notification.html")]
struct NotificationTemplate<'a> {
    message: &'a str,
    show_delay_ms: u32,
    visible_ms: u32,
    hide_ms: u32,
}

/// Full storefront page, assembled from inline fragments.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav_links: String,
    pub cart_count: String,
    pub category_bar: String,
    pub product_grid: String,
    pub cart_panel: String,
    pub product_modal: String,
    pub checkout_modal: String,
}

// =============================================================================
// Renderers
// =============================================================================

/// Render the product grid (`#product-container`).
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn product_list(listing: &ProductListing, placement: Placement) -> askama::Result<String> {
    let (cards, message) = match listing {
        ProductListing::Products(products) => {
            (products.iter().map(ProductCardView::from).collect(), None)
        }
        ProductListing::NoMatches => (Vec::new(), Some(MSG_NO_MATCHES)),
        ProductListing::LoadFailed => (Vec::new(), Some(MSG_LOAD_FAILED)),
        ProductListing::SearchFailed => (Vec::new(), Some(MSG_SEARCH_FAILED)),
    };

    ProductGridTemplate {
        cards,
        message,
        oob: placement.is_oob(),
    }
    .render()
}

/// Render the star glyphs for a rating on its own.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn stars(rate: f64) -> askama::Result<String> {
    StarsTemplate {
        glyphs: StarRating::from_rate(rate).glyphs(),
    }
    .render()
}

/// Render the cart sidebar and its overlay (`#cart-sidebar`, `#cart-overlay`).
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn cart_list(cart: &Cart, open: bool, placement: Placement) -> askama::Result<String> {
    CartPanelTemplate {
        open,
        lines: cart.items().iter().map(CartLineView::from).collect(),
        subtotal: cart.subtotal().to_string(),
        shipping: cart.shipping().to_string(),
        grand_total: cart.grand_total().to_string(),
        oob: placement.is_oob(),
    }
    .render()
}

/// Render the cart badge (`#cart-count`).
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn cart_count(count: u32, placement: Placement) -> askama::Result<String> {
    CartCountTemplate {
        count,
        oob: placement.is_oob(),
    }
    .render()
}

/// Render the product detail modal (`#product-modal`), closed when
/// `product` is `None`.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn product_detail(product: Option<&Product>, placement: Placement) -> askama::Result<String> {
    ProductModalTemplate {
        product: product.map(ProductCardView::from),
        oob: placement.is_oob(),
    }
    .render()
}

/// Render the checkout modal (`#checkout-modal`) with the order summary and
/// an empty form.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn checkout_summary(cart: &Cart, open: bool, placement: Placement) -> askama::Result<String> {
    CheckoutModalTemplate {
        open,
        lines: cart.items().iter().map(CartLineView::from).collect(),
        total: cart.grand_total().to_string(),
        oob: placement.is_oob(),
    }
    .render()
}

/// Render the category filter buttons (`#category-bar`).
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn category_bar(
    categories: &[String],
    active: &CategoryFilter,
    placement: Placement,
) -> askama::Result<String> {
    let mut buttons = vec![CategoryButtonView::new(
        "All",
        CategoryFilter::ALL,
        *active == CategoryFilter::All,
    )];
    buttons.extend(categories.iter().map(|category| {
        CategoryButtonView::new(category, category, active.is_category(category))
    }));

    CategoryBarTemplate {
        buttons,
        oob: placement.is_oob(),
    }
    .render()
}

/// Render the navigation links (`#nav-links`), expanded on small screens
/// when `open`.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn nav_links(open: bool, placement: Placement) -> askama::Result<String> {
    NavLinksTemplate {
        open,
        oob: placement.is_oob(),
    }
    .render()
}

/// Render a toast appended to `#notifications`. Always out-of-band.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn notification(message: &str) -> askama::Result<String> {
    NotificationTemplate {
        message,
        show_delay_ms: NOTIFICATION_SHOW_DELAY_MS,
        visible_ms: NOTIFICATION_VISIBLE_MS,
        hide_ms: NOTIFICATION_HIDE_MS,
    }
    .render()
}
