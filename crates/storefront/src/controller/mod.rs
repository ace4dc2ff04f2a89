//! View controller.
//!
//! Turns a resolved [`Action`] into mutations of the [`PageSession`] and a
//! set of out-of-band fragments that repaint exactly the parts of the page
//! the action touched.

pub mod dispatch;
pub mod state;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use emporium_core::{CheckoutError, CheckoutForm, Order, ProductId};

use crate::catalog::CatalogClient;
use crate::error::add_breadcrumb;
use crate::render::{self, HomeTemplate, Placement, ProductListing};

pub use dispatch::{Action, DomEvent, EventType, resolve};
pub use state::{CategoryFilter, PAGE_SESSION_KEY, PageId, PageSession, PageStore, ViewState};

pub const MSG_ADD_FAILED: &str = "Could not add item to cart";
pub const MSG_DETAIL_FAILED: &str = "Failed to load product details";
pub const MSG_ITEM_REMOVED: &str = "Item removed from cart";
pub const MSG_MISSING_FIELDS: &str = "Please fill in all required fields";
pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address";
pub const MSG_ORDER_PLACED: &str = "Order placed successfully!";

/// Characters of the product title quoted in the add-to-cart notice.
const ADDED_TITLE_CHARS: usize = 20;

/// Fragments produced by one action, in render order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Update {
    fragments: Vec<String>,
}

impl Update {
    fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// Whether the action left the page as it was.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

impl IntoResponse for Update {
    fn into_response(self) -> Response {
        if self.fragments.is_empty() {
            StatusCode::NO_CONTENT.into_response()
        } else {
            Html(self.fragments.concat()).into_response()
        }
    }
}

/// Notice shown after a product lands in the cart.
#[must_use]
pub fn added_notice(title: &str) -> String {
    let short: String = title.chars().take(ADDED_TITLE_CHARS).collect();
    format!("{short} added to cart!")
}

/// Applies actions against the catalog and a page session.
pub struct Controller<'a> {
    catalog: &'a CatalogClient,
    categories: &'a [String],
}

impl<'a> Controller<'a> {
    #[must_use]
    pub const fn new(catalog: &'a CatalogClient, categories: &'a [String]) -> Self {
        Self {
            catalog,
            categories,
        }
    }

    /// Render the full page for a fresh session, with the whole catalog in
    /// the grid.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails. A catalog failure is
    /// rendered as the load-failure message instead.
    pub async fn initial_page(&self, page: &PageSession) -> askama::Result<HomeTemplate> {
        let listing = match self.catalog.fetch_all().await {
            Ok(products) => ProductListing::Products(products),
            Err(_) => ProductListing::LoadFailed,
        };
        let view = &page.view;

        Ok(HomeTemplate {
            nav_links: render::nav_links(view.menu_open, Placement::Inline)?,
            cart_count: render::cart_count(page.cart.total_item_count(), Placement::Inline)?,
            category_bar: render::category_bar(self.categories, &view.category, Placement::Inline)?,
            product_grid: render::product_list(&listing, Placement::Inline)?,
            cart_panel: render::cart_list(&page.cart, view.cart_open, Placement::Inline)?,
            product_modal: render::product_detail(None, Placement::Inline)?,
            checkout_modal: render::checkout_summary(
                &page.cart,
                view.checkout_open,
                Placement::Inline,
            )?,
        })
    }

    /// Apply `action` to `page` and render what changed.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails. Catalog and validation
    /// failures are reported to the user as notices or grid messages.
    #[tracing::instrument(skip(self, page))]
    pub async fn handle(&self, action: Action, page: &mut PageSession) -> askama::Result<Update> {
        let mut update = Update::default();

        match action {
            Action::ToggleCart => {
                page.view.toggle_cart();
                update.push(cart_panel(page)?);
            }
            Action::ToggleMenu => {
                page.view.toggle_menu();
                update.push(render::nav_links(page.view.menu_open, Placement::OutOfBand)?);
            }
            Action::AddToCart(id) => {
                self.add_to_cart(id, page, &mut update).await?;
            }
            Action::AddFromDetail(id) => {
                self.add_to_cart(id, page, &mut update).await?;
                page.view.close_detail();
                update.push(render::product_detail(None, Placement::OutOfBand)?);
            }
            Action::ViewDetails(id) => match self.catalog.fetch_one(id).await {
                Ok(product) => {
                    page.view.open_detail(id);
                    update.push(render::product_detail(Some(&product), Placement::OutOfBand)?);
                }
                Err(e) => {
                    tracing::warn!(product_id = %id, error = %e, "Product detail unavailable");
                    update.push(render::notification(MSG_DETAIL_FAILED)?);
                }
            },
            Action::CloseDetail => {
                page.view.close_detail();
                update.push(render::product_detail(None, Placement::OutOfBand)?);
            }
            Action::SelectCategory(filter) => {
                let listing = self.load_category(&filter).await;
                page.view.category = filter;
                update.push(render::category_bar(
                    self.categories,
                    &page.view.category,
                    Placement::OutOfBand,
                )?);
                update.push(render::product_list(&listing, Placement::OutOfBand)?);
            }
            Action::Search(term) => {
                let term = term.trim();
                if !term.is_empty() {
                    let listing = self.search(term).await;
                    update.push(render::product_list(&listing, Placement::OutOfBand)?);
                }
            }
            Action::ChangeQuantity { id, delta } => {
                page.cart.change_quantity(id, delta);
                update.push(cart_count(page)?);
                update.push(cart_panel(page)?);
            }
            Action::RemoveItem(id) => {
                if page.cart.remove(id) {
                    update.push(cart_count(page)?);
                    update.push(cart_panel(page)?);
                    update.push(render::notification(MSG_ITEM_REMOVED)?);
                }
            }
            Action::OpenCheckout => {
                if page.view.open_checkout(&page.cart) {
                    update.push(render::checkout_summary(&page.cart, true, Placement::OutOfBand)?);
                } else {
                    update.push(render::notification(render::MSG_EMPTY_CART)?);
                }
            }
            Action::CloseCheckout => {
                page.view.close_checkout();
                update.push(render::checkout_summary(&page.cart, false, Placement::OutOfBand)?);
            }
            Action::PlaceOrder(form) => {
                Self::place_order(&form, page, &mut update)?;
            }
        }

        Ok(update)
    }

    async fn add_to_cart(
        &self,
        id: ProductId,
        page: &mut PageSession,
        update: &mut Update,
    ) -> askama::Result<()> {
        match self.catalog.fetch_one(id).await {
            Ok(product) => {
                page.cart.add(&product);
                tracing::debug!(product_id = %id, "Added to cart");
                update.push(cart_count(page)?);
                update.push(cart_panel(page)?);
                update.push(render::notification(&added_notice(&product.title))?);
            }
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "Could not add product to cart");
                update.push(render::notification(MSG_ADD_FAILED)?);
            }
        }
        Ok(())
    }

    fn place_order(
        form: &CheckoutForm,
        page: &mut PageSession,
        update: &mut Update,
    ) -> askama::Result<()> {
        let order = match Order::place(form, &mut page.cart) {
            Ok(order) => order,
            Err(e) => {
                tracing::debug!(error = %e, "Checkout rejected");
                let message = match e {
                    CheckoutError::MissingField(_) => MSG_MISSING_FIELDS,
                    CheckoutError::InvalidEmail(_) => MSG_INVALID_EMAIL,
                    CheckoutError::EmptyCart => render::MSG_EMPTY_CART,
                };
                update.push(render::notification(message)?);
                return Ok(());
            }
        };

        log_order(&order);

        page.view.close_checkout();
        update.push(render::checkout_summary(&page.cart, false, Placement::OutOfBand)?);
        update.push(cart_count(page)?);
        update.push(cart_panel(page)?);
        update.push(render::notification(MSG_ORDER_PLACED)?);
        Ok(())
    }

    async fn load_category(&self, filter: &CategoryFilter) -> ProductListing {
        let result = match filter {
            CategoryFilter::All => self.catalog.fetch_all().await,
            CategoryFilter::Category(category) => self.catalog.fetch_by_category(category).await,
        };
        result.map_or(ProductListing::LoadFailed, ProductListing::Products)
    }

    async fn search(&self, term: &str) -> ProductListing {
        match self.catalog.search(term).await {
            Ok(products) if products.is_empty() => ProductListing::NoMatches,
            Ok(products) => ProductListing::Products(products),
            Err(_) => ProductListing::SearchFailed,
        }
    }
}

fn cart_count(page: &PageSession) -> askama::Result<String> {
    render::cart_count(page.cart.total_item_count(), Placement::OutOfBand)
}

fn cart_panel(page: &PageSession) -> askama::Result<String> {
    render::cart_list(&page.cart, page.view.cart_open, Placement::OutOfBand)
}

/// JSON form of `order` for the order log, or `None` if it cannot be encoded.
fn order_payload(order: &Order) -> Option<String> {
    serde_json::to_string(order)
        .inspect_err(|e| tracing::warn!(order_id = %order.id, error = %e, "Could not serialize order"))
        .ok()
}

/// Record a placed order. Orders are not persisted anywhere else.
fn log_order(order: &Order) {
    let payload = order_payload(order);
    tracing::info!(
        order_id = %order.id,
        items = order.item_count(),
        total = %order.total,
        order = payload.as_deref(),
        "Order placed"
    );

    let order_id = order.id.to_string();
    let total = order.total.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order_id.as_str()), ("total", total.as_str())]),
    );
}
