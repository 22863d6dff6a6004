//! The catalog feed controller.
//!
//! Owns everything the product list shows:
//!
//! * the **displayed sequence**: catalog pages appended in order,
//! * the **favorite set**: ids toggled by the user (session only),
//! * the **added list**: user-submitted products, newest first,
//! * the active [`ViewFilter`].
//!
//! Loading a page is split in two so the delay in between can live elsewhere
//! (see [`crate::loader`]): [`Feed::begin_load`] checks the preconditions and
//! hands out a [`PageRequest`], [`Feed::complete_load`] appends the page.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::catalog::{Catalog, Product};
use crate::store::KeyValueStore;
use crate::submission;

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Which products the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewFilter {
    #[default]
    All,
    Favorites,
    Added,
}

impl ViewFilter {
    pub const ALL: [ViewFilter; 3] = [ViewFilter::All, ViewFilter::Favorites, ViewFilter::Added];

    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All",
            ViewFilter::Favorites => "Favorites",
            ViewFilter::Added => "Added",
        }
    }
}

/// Source of request tokens.  Process-wide so a message addressed to a feed
/// that has since been dropped can never match a newer feed's request.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies one page load.  Only the token currently in flight is accepted
/// on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// A page load handed out by [`Feed::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub token: RequestToken,
    /// 1-based page number.
    pub page: usize,
}

/// Single-flight guard: at most one outstanding request at a time.
#[derive(Debug, Default)]
struct SingleFlight {
    in_flight: Option<RequestToken>,
}

impl SingleFlight {
    fn try_begin(&mut self) -> Option<RequestToken> {
        if self.in_flight.is_some() {
            return None;
        }
        let token = RequestToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed));
        self.in_flight = Some(token);
        Some(token)
    }

    /// Release the guard if `token` is the one in flight.
    fn finish(&mut self, token: RequestToken) -> bool {
        if self.in_flight == Some(token) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}

pub struct Feed {
    catalog: Arc<Catalog>,
    page_size: usize,
    /// Next page to load, 1-based.
    page: usize,
    displayed: Vec<Product>,
    favorites: HashSet<String>,
    added: Vec<Product>,
    filter: ViewFilter,
    flight: SingleFlight,
}

impl Feed {
    pub fn new(catalog: Arc<Catalog>, page_size: usize) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
            page: 1,
            displayed: Vec::new(),
            favorites: HashSet::new(),
            added: Vec::new(),
            filter: ViewFilter::All,
            flight: SingleFlight::default(),
        }
    }

    // -- paging --------------------------------------------------------------

    /// Start a page load, if allowed.
    ///
    /// Returns `None` while another load is in flight or when the active
    /// filter is not [`ViewFilter::All`].
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.filter != ViewFilter::All {
            return None;
        }
        let token = self.flight.try_begin()?;
        tracing::debug!(page = self.page, "page load started");
        Some(PageRequest { token, page: self.page })
    }

    /// Finish `request`: append its page and advance the page counter.
    ///
    /// Returns the number of products appended.  A stale request (not the
    /// one in flight) changes nothing and returns 0.  Past the end of the
    /// catalog the page is empty, which is not an error.
    pub fn complete_load(&mut self, request: PageRequest) -> usize {
        if !self.flight.finish(request.token) {
            tracing::warn!(page = request.page, "ignoring stale page completion");
            return 0;
        }

        let start = (request.page - 1).saturating_mul(self.page_size);
        let slice = self.catalog.slice(start, self.page_size);
        self.displayed.extend_from_slice(slice);
        self.page = request.page + 1;

        tracing::debug!(page = request.page, appended = slice.len(), total = self.displayed.len(), "page loaded");
        slice.len()
    }

    /// Start and immediately finish a page load, with no delay.
    pub fn load_now(&mut self) -> Option<usize> {
        let request = self.begin_load()?;
        Some(self.complete_load(request))
    }

    pub fn is_loading(&self) -> bool {
        self.flight.is_busy()
    }

    /// The next page number to load.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Whether every catalog product has been displayed.
    pub fn is_exhausted(&self) -> bool {
        self.displayed.len() >= self.catalog.len()
    }

    pub fn displayed(&self) -> &[Product] {
        &self.displayed
    }

    // -- favorites -----------------------------------------------------------

    /// Flip `id` in the favorite set.  The id need not be displayed.
    pub fn toggle_favorite(&mut self, id: &str) {
        if !self.favorites.remove(id) {
            self.favorites.insert(id.to_string());
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorites(&self) -> &HashSet<String> {
        &self.favorites
    }

    // -- added products ------------------------------------------------------

    /// Reload the added list from `store`, newest first.
    ///
    /// A missing key or blank value yields an empty list.  Unreadable data is logged and the
    /// previous list is kept.
    pub fn load_added(&mut self, store: &dyn KeyValueStore) {
        match submission::load(store) {
            Ok(mut products) => {
                products.reverse();
                self.added = products;
            }
            Err(e) => tracing::warn!(error = %e, "could not load added products; keeping last snapshot"),
        }
    }

    pub fn added(&self) -> &[Product] {
        &self.added
    }

    // -- filter --------------------------------------------------------------

    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    /// Make `filter` the active view.  Entering `Added` reloads the added
    /// list from `store`.
    pub fn select_filter(&mut self, filter: ViewFilter, store: &dyn KeyValueStore) {
        self.filter = filter;
        if filter == ViewFilter::Added {
            self.load_added(store);
        }
    }

    /// The products for the active filter, in display order.
    pub fn visible(&self) -> Vec<&Product> {
        match self.filter {
            ViewFilter::All => self.displayed.iter().collect(),
            ViewFilter::Favorites => self
                .displayed
                .iter()
                .filter(|p| self.favorites.contains(&p.id))
                .collect(),
            ViewFilter::Added => self.added.iter().collect(),
        }
    }

    pub fn visible_len(&self) -> usize {
        match self.filter {
            ViewFilter::All => self.displayed.len(),
            ViewFilter::Favorites => self
                .displayed
                .iter()
                .filter(|p| self.favorites.contains(&p.id))
                .count(),
            ViewFilter::Added => self.added.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{keys, MemoryStore};

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: "R$ 10,00".to_string(),
            description: None,
            image: format!("https://example.com/{id}.png"),
        }
    }

    fn feed(count: usize, page_size: usize) -> Feed {
        Feed::new(Arc::new(Catalog::generate(count, 11)), page_size)
    }

    // -- paging --------------------------------------------------------------

    #[test]
    fn new_feed_starts_empty_on_page_one() {
        let feed = feed(100, 20);
        assert!(feed.displayed().is_empty());
        assert_eq!(feed.page(), 1);
        assert_eq!(feed.filter(), ViewFilter::All);
        assert!(!feed.is_loading());
    }

    #[test]
    fn first_two_loads_yield_consecutive_pages() {
        let mut feed = feed(100, 20);
        let catalog = feed.catalog.clone();

        assert_eq!(feed.load_now(), Some(20));
        assert_eq!(feed.displayed(), &catalog.products()[0..20]);

        assert_eq!(feed.load_now(), Some(20));
        assert_eq!(feed.displayed(), &catalog.products()[0..40]);
        assert_eq!(feed.page(), 3);
    }

    #[test]
    fn loading_every_page_reproduces_the_catalog() {
        let (n, p) = (103, 20);
        let mut feed = feed(n, p);
        for _ in 0..n.div_ceil(p) {
            feed.load_now();
        }

        assert_eq!(feed.displayed(), feed.catalog.products());
        assert!(feed.is_exhausted());
    }

    #[test]
    fn loading_past_the_end_appends_nothing() {
        let mut feed = feed(10, 20);
        assert_eq!(feed.load_now(), Some(10));
        assert_eq!(feed.load_now(), Some(0));
        assert_eq!(feed.displayed().len(), 10);
        assert_eq!(feed.page(), 3);
    }

    #[test]
    fn second_begin_while_pending_is_refused() {
        let mut feed = feed(100, 20);
        let first = feed.begin_load().unwrap();
        assert!(feed.is_loading());
        assert_eq!(feed.begin_load(), None);

        assert_eq!(feed.complete_load(first), 20);
        assert!(!feed.is_loading());
        assert_eq!(feed.displayed().len(), 20);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut feed = feed(100, 20);
        let first = feed.begin_load().unwrap();
        feed.complete_load(first);

        assert_eq!(feed.complete_load(first), 0, "replayed request");
        assert_eq!(feed.displayed().len(), 20);
        assert_eq!(feed.page(), 2);
    }

    #[test]
    fn request_from_another_feed_is_stale() {
        let mut old = feed(100, 20);
        let mut new = feed(100, 20);
        let old_request = old.begin_load().unwrap();
        let new_request = new.begin_load().unwrap();

        assert_ne!(old_request.token, new_request.token);
        assert_eq!(new.complete_load(old_request), 0);
        assert!(new.is_loading());
    }

    #[test]
    fn loads_are_suspended_outside_all() {
        let store = MemoryStore::new();
        let mut feed = feed(100, 20);
        feed.load_now();

        feed.select_filter(ViewFilter::Favorites, &store);
        assert_eq!(feed.begin_load(), None);

        feed.select_filter(ViewFilter::Added, &store);
        assert_eq!(feed.begin_load(), None);

        feed.select_filter(ViewFilter::All, &store);
        assert_eq!(feed.load_now(), Some(20));
        assert_eq!(feed.displayed().len(), 40);
    }

    #[test]
    fn pending_load_still_completes_after_filter_change() {
        let store = MemoryStore::new();
        let mut feed = feed(100, 20);
        let request = feed.begin_load().unwrap();
        feed.select_filter(ViewFilter::Favorites, &store);

        assert_eq!(feed.complete_load(request), 20);
        assert!(!feed.is_loading());
    }

    // -- favorites -----------------------------------------------------------

    #[test]
    fn toggle_favorite_twice_is_identity() {
        let mut feed = feed(10, 5);
        feed.toggle_favorite("x");
        assert!(feed.is_favorite("x"));
        feed.toggle_favorite("x");
        assert!(!feed.is_favorite("x"));
        assert!(feed.favorites().is_empty());
    }

    #[test]
    fn favorites_view_keeps_display_order() {
        let store = MemoryStore::new();
        let catalog = Catalog::from_products((1..=8).map(|i| product(&format!("id{i}"))).collect());
        let mut feed = Feed::new(Arc::new(catalog), 20);
        feed.load_now();

        feed.toggle_favorite("id5");
        feed.toggle_favorite("id2");
        feed.toggle_favorite("not-loaded");
        feed.select_filter(ViewFilter::Favorites, &store);

        let ids: Vec<&str> = feed.visible().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["id2", "id5"]);
        assert_eq!(feed.visible_len(), 2);
    }

    // -- added ---------------------------------------------------------------

    #[test]
    fn added_view_is_newest_first() {
        let mut store = MemoryStore::new();
        let stored = vec![product("P1"), product("P2"), product("P3")];
        store
            .set(keys::USER_PRODUCTS, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let mut feed = feed(10, 5);
        feed.select_filter(ViewFilter::Added, &store);

        let ids: Vec<&str> = feed.visible().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["P3", "P2", "P1"]);
    }

    #[test]
    fn added_view_without_data_is_empty() {
        let store = MemoryStore::new();
        let mut feed = feed(10, 5);
        feed.select_filter(ViewFilter::Added, &store);
        assert!(feed.visible().is_empty());
    }

    #[test]
    fn blank_added_value_clears_the_list() {
        let mut store = MemoryStore::new();
        store
            .set(keys::USER_PRODUCTS, &serde_json::to_string(&vec![product("P1")]).unwrap())
            .unwrap();

        let mut feed = feed(10, 5);
        feed.load_added(&store);
        assert_eq!(feed.added().len(), 1);

        store.set(keys::USER_PRODUCTS, "").unwrap();
        feed.select_filter(ViewFilter::Added, &store);
        assert!(feed.visible().is_empty());
    }

    #[test]
    fn malformed_added_data_keeps_last_snapshot() {
        let mut store = MemoryStore::new();
        store
            .set(keys::USER_PRODUCTS, &serde_json::to_string(&vec![product("P1")]).unwrap())
            .unwrap();

        let mut feed = feed(10, 5);
        feed.load_added(&store);
        assert_eq!(feed.added().len(), 1);

        store.set(keys::USER_PRODUCTS, "not json").unwrap();
        feed.select_filter(ViewFilter::Added, &store);
        assert_eq!(feed.added().len(), 1);
        assert_eq!(feed.added()[0].id, "P1");
    }

    #[test]
    fn all_view_shows_displayed_sequence() {
        let store = MemoryStore::new();
        let mut feed = feed(50, 20);
        feed.load_now();
        feed.select_filter(ViewFilter::Added, &store);
        feed.select_filter(ViewFilter::All, &store);
        assert_eq!(feed.visible().len(), 20);
    }
}
