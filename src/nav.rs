//! Screen stack.
//!
//! `navigate` pushes a screen, `replace` swaps the top one (used after login,
//! logout and registration so "back" cannot return to them), `back` pops.

use crate::catalog::Product;

/// Parameters of the product details screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsParams {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for DetailsParams {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            price: p.price.clone(),
            image: p.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Home,
    ProductList,
    ProductDetails(DetailsParams),
    AddProduct,
    Profile,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Home => "Home",
            Screen::ProductList => "Products",
            Screen::ProductDetails(_) => "Product details",
            Screen::AddProduct => "Add product",
            Screen::Profile => "Profile",
        }
    }
}

/// A non-empty stack of screens.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Navigator {
    pub fn new(initial: Screen) -> Self {
        Self { stack: vec![initial] }
    }

    pub fn current(&self) -> &Screen {
        // The stack is never empty: `back` refuses to pop the last screen.
        &self.stack[self.stack.len() - 1]
    }

    pub fn navigate(&mut self, screen: Screen) {
        tracing::debug!(to = screen.title(), "navigate");
        self.stack.push(screen);
    }

    pub fn replace(&mut self, screen: Screen) {
        tracing::debug!(to = screen.title(), "replace");
        self.stack.pop();
        self.stack.push(screen);
    }

    /// Pop the current screen.  Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
