use std::sync::Arc;

use chrono::Utc;
use ratatui::widgets::ListState;

use crate::account::{self, User};
use crate::catalog::{Catalog, Product};
use crate::feed::{Feed, ViewFilter};
use crate::form::{Field, Form};
use crate::loader::{self, LoadMsg, PageLoader};
use crate::nav::{DetailsParams, Navigator, Screen};
use crate::store::KeyValueStore;
use crate::submission::{self, NewProduct};

/// Banner posted by the home screen's "test notification" action.
pub const NOTIFICATION: &str = "🛍️ New product available! Check the list now.";

pub struct App {
    store: Box<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
    loader: PageLoader,
    page_size: usize,
    /// Rows from the end of the list at which the next page is requested.
    prefetch: usize,

    pub nav: Navigator,
    /// Present while the product list is on the stack.
    pub feed: Option<Feed>,
    /// Selection in the product list.
    pub list_state: ListState,
    /// The logged-in account.
    pub session: Option<User>,

    pub login_form: Form,
    pub register_form: Form,
    pub product_form: Form,
    pub profile_form: Form,

    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status / dialog message.
    pub status: String,
}

impl App {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        catalog: Arc<Catalog>,
        loader: PageLoader,
        page_size: usize,
        prefetch: usize,
    ) -> Self {
        Self {
            store,
            catalog,
            loader,
            page_size,
            prefetch,
            nav: Navigator::new(Screen::Login),
            feed: None,
            list_state: ListState::default(),
            session: None,
            login_form: Form::new(vec![Field::new("E-mail"), Field::secret("Password")]),
            register_form: Form::new(vec![
                Field::new("Name"),
                Field::new("E-mail"),
                Field::secret("Password"),
            ]),
            product_form: Form::new(vec![
                Field::new("Name"),
                Field::new("Price (e.g. R$ 99,90)"),
                Field::new("Description"),
                Field::new("Photo URI"),
            ]),
            profile_form: Form::new(vec![
                Field::new("Name"),
                Field::new("E-mail"),
                Field::new("Phone"),
                Field::new("Photo URI"),
            ]),
            quit: false,
            status: "Welcome! Log in or press Ctrl-R to register.".into(),
        }
    }

    /// The form belonging to the current screen, if it has one.
    pub fn active_form(&mut self) -> Option<&mut Form> {
        match self.nav.current() {
            Screen::Login => Some(&mut self.login_form),
            Screen::Register => Some(&mut self.register_form),
            Screen::AddProduct => Some(&mut self.product_form),
            Screen::Profile => Some(&mut self.profile_form),
            _ => None,
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn open_register(&mut self) {
        self.register_form.clear();
        self.nav.navigate(Screen::Register);
    }

    pub fn open_add_product(&mut self) {
        self.nav.navigate(Screen::AddProduct);
    }

    /// Mount the product list: a fresh feed, its first page and the added
    /// list.
    pub fn open_product_list(&mut self) {
        let mut feed = Feed::new(self.catalog.clone(), self.page_size);
        self.loader.request(&mut feed);
        feed.load_added(self.store.as_ref());

        self.feed = Some(feed);
        self.list_state = ListState::default();
        self.nav.navigate(Screen::ProductList);
    }

    pub fn open_profile(&mut self) {
        match account::load_profile(self.store.as_ref()) {
            Ok(Some(user)) => {
                self.profile_form.clear();
                self.profile_form.set_value(0, user.name);
                self.profile_form.set_value(1, user.email);
                self.profile_form.set_value(2, user.phone.unwrap_or_default());
                self.profile_form.set_value(3, user.photo.unwrap_or_default());
            }
            Ok(None) => self.profile_form.clear(),
            Err(e) => {
                tracing::error!(error = %e, "failed to load profile");
                self.status = e.to_string();
            }
        }
        self.nav.navigate(Screen::Profile);
    }

    /// Open the details of the selected product.
    pub fn open_details(&mut self) {
        let Some(product) = self.selected_product() else {
            return;
        };
        let params = DetailsParams::from(product);
        self.nav.navigate(Screen::ProductDetails(params));
    }

    /// Leave the current screen.  At the root this quits.
    pub fn back(&mut self) {
        let leaving_list = matches!(self.nav.current(), Screen::ProductList);
        if !self.nav.back() {
            self.quit = true;
            return;
        }
        if leaving_list {
            self.feed = None;
        }
    }

    // -- accounts ------------------------------------------------------------

    pub fn submit_login(&mut self) {
        let email = self.login_form.value(0).to_string();
        let password = self.login_form.value(1).to_string();

        match account::login(self.store.as_mut(), &email, &password) {
            Ok(user) => {
                self.status = format!("Welcome, {}!", user.name);
                self.session = Some(user);
                self.login_form.clear();
                self.nav.replace(Screen::Home);
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    pub fn submit_register(&mut self) {
        let name = self.register_form.value(0).to_string();
        let email = self.register_form.value(1).to_string();
        let password = self.register_form.value(2).to_string();

        match account::register(self.store.as_mut(), &name, &email, &password) {
            Ok(_) => {
                self.status = "Account created! Please log in.".into();
                self.register_form.clear();
                self.nav.replace(Screen::Login);
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = account::logout(self.store.as_mut()) {
            tracing::error!(error = %e, "logout failed");
        }
        self.session = None;
        self.feed = None;
        self.status = "Logged out.".into();
        self.nav.replace(Screen::Login);
    }

    pub fn save_profile(&mut self) {
        let existing = match account::load_profile(self.store.as_ref()) {
            Ok(user) => user.unwrap_or_default(),
            Err(e) => {
                self.status = format!("Error: {e}");
                return;
            }
        };

        let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let user = User {
            name: self.profile_form.value(0).to_string(),
            email: self.profile_form.value(1).to_string(),
            phone: optional(self.profile_form.value(2)),
            photo: optional(self.profile_form.value(3)),
            ..existing
        };

        match account::save_profile(self.store.as_mut(), &user) {
            Ok(()) => self.status = "Profile updated!".into(),
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    // -- add product ---------------------------------------------------------

    pub fn submit_product(&mut self) {
        let form = NewProduct {
            name: self.product_form.value(0).to_string(),
            price: self.product_form.value(1).to_string(),
            description: self.product_form.value(2).to_string(),
            image: self.product_form.value(3).to_string(),
        };

        match submission::save(self.store.as_mut(), &form, Utc::now()) {
            Ok(product) => {
                self.status = format!("Saved \"{}\".", product.name);
                self.product_form.clear();
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    pub fn notify(&mut self) {
        tracing::info!("local notification posted");
        self.status = NOTIFICATION.into();
    }

    // -- product list --------------------------------------------------------

    /// Products shown for the active filter.
    pub fn visible_products(&self) -> Vec<&Product> {
        self.feed.as_ref().map(Feed::visible).unwrap_or_default()
    }

    pub fn selected_product(&self) -> Option<&Product> {
        let index = self.list_state.selected()?;
        self.visible_products().get(index).copied()
    }

    pub fn select_filter(&mut self, filter: ViewFilter) {
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        feed.select_filter(filter, self.store.as_ref());
        self.list_state = ListState::default();
        self.prefetch_if_near_end();
    }

    /// Toggle the favorite flag of the selected product, or of the product on
    /// the details screen.
    pub fn toggle_favorite(&mut self) {
        let id = match self.nav.current() {
            Screen::ProductDetails(params) => Some(params.id.clone()),
            _ => self.selected_product().map(|p| p.id.clone()),
        };
        let (Some(id), Some(feed)) = (id, self.feed.as_mut()) else {
            return;
        };

        feed.toggle_favorite(&id);
        if feed.filter() == ViewFilter::Favorites {
            clamp_selection(&mut self.list_state, feed.visible_len());
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.feed.as_ref().is_some_and(|f| f.is_favorite(id))
    }

    /// Apply a loader message.
    pub fn handle_load(&mut self, msg: LoadMsg) {
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        let appended = loader::apply(feed, msg);
        if appended > 0 {
            self.status = format!("Loaded {appended} products");
        }
        self.prefetch_if_near_end();
    }

    /// Request the next page when the selection is within `prefetch` rows of
    /// the end of the list.
    fn prefetch_if_near_end(&mut self) {
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        if feed.filter() != ViewFilter::All || feed.is_exhausted() {
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        if selected + self.prefetch >= feed.visible_len() {
            self.loader.request(feed);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.prefetch_if_near_end();
    }

    pub fn select_previous(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
            self.prefetch_if_near_end();
        }
    }

    fn visible_len(&self) -> usize {
        self.feed.as_ref().map_or(0, Feed::visible_len)
    }
}

fn clamp_selection(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
