//! Page-session state: the cart plus which UI surfaces are showing.
//!
//! Live pages are held in a [`PageStore`]. The session cookie's record only
//! carries the [`PageId`] under [`PAGE_SESSION_KEY`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use emporium_core::{Cart, ProductId};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Session key under which the current [`PageId`] is stored.
pub const PAGE_SESSION_KEY: &str = "page_id";

/// Everything one browser page knows about. Dropped on full page load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSession {
    pub cart: Cart,
    pub view: ViewState,
}

/// Active product grid filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Button value meaning "no filter".
    pub const ALL: &'static str = "all";

    /// Parse a category button value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(Self::ALL) {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    /// Whether this filter selects exactly `category`.
    #[must_use]
    pub fn is_category(&self, category: &str) -> bool {
        matches!(self, Self::Category(c) if c == category)
    }
}

/// Open/closed state of each independently togglable surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub cart_open: bool,
    pub menu_open: bool,
    pub detail: Option<ProductId>,
    pub checkout_open: bool,
    pub category: CategoryFilter,
}

impl ViewState {
    pub const fn toggle_cart(&mut self) {
        self.cart_open = !self.cart_open;
    }

    pub const fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub const fn open_detail(&mut self, id: ProductId) {
        self.detail = Some(id);
    }

    pub const fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Open the checkout modal. Refuses (returns `false`) for an empty cart.
    pub fn open_checkout(&mut self, cart: &Cart) -> bool {
        self.checkout_open = !cart.is_empty();
        self.checkout_open
    }

    pub const fn close_checkout(&mut self) {
        self.checkout_open = false;
    }
}

/// Identifies one loaded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Live page sessions, each behind its own lock.
///
/// A DOM event holds its page's lock from load to store, so events from one
/// page apply one at a time and none overwrites another. Pages left idle
/// longer than `idle` are evicted.
#[derive(Clone)]
pub struct PageStore {
    pages: Cache<PageId, Arc<Mutex<PageSession>>>,
}

impl PageStore {
    #[must_use]
    pub fn new(max_pages: u64, idle: Duration) -> Self {
        let pages = Cache::builder()
            .max_capacity(max_pages)
            .time_to_idle(idle)
            .build();
        Self { pages }
    }

    /// Start an empty page.
    pub async fn start(&self) -> PageId {
        let id = PageId::new();
        self.pages
            .insert(id, Arc::new(Mutex::new(PageSession::default())))
            .await;
        id
    }

    /// Lock the page `id` for one event.
    ///
    /// An unknown or evicted id gets an empty page, as after a page load.
    pub async fn lock(&self, id: PageId) -> OwnedMutexGuard<PageSession> {
        let page = self
            .pages
            .get_with(id, async { Arc::new(Mutex::new(PageSession::default())) })
            .await;
        page.lock_owned().await
    }

    /// Forget the page `id`.
    pub async fn discard(&self, id: PageId) {
        self.pages.invalidate(&id).await;
    }
}

impl fmt::Debug for PageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageStore")
            .field("pages", &self.pages.entry_count())
            .finish()
    }
}
