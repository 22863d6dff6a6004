//! The synthetic product catalog.
//!
//! A [`Catalog`] stands in for a large backend result set: it is generated
//! once, up front, and then only ever read.  The feed controller pages through
//! it instead of making network calls.
//!
//! ## For contributors
//!
//! Construct catalogs explicitly and pass them in (usually behind an
//! [`Arc`](std::sync::Arc)).  Tests should prefer small catalogs built with
//! [`Catalog::generate`] and a fixed seed, or [`Catalog::from_products`] when
//! exact contents matter.

mod generator;
mod product;

pub use product::Product;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default number of products in a generated catalog.
pub const DEFAULT_SIZE: usize = 10_000;

/// An immutable, ordered set of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Generate `count` synthetic products from `seed`.
    ///
    /// The whole catalog is allocated immediately.  The same `(count, seed)`
    /// pair always produces the same products in the same order.
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let products = (0..count).map(|_| generator::product(&mut rng)).collect();
        tracing::debug!(count, seed, "catalog generated");
        Self { products }
    }

    /// Wrap an existing list of products.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Up to `len` products starting at `start`.
    ///
    /// Clamped to the catalog bounds: past the end this is an empty slice.
    pub fn slice(&self, start: usize, len: usize) -> &[Product] {
        let start = start.min(self.products.len());
        let end = start.saturating_add(len).min(self.products.len());
        &self.products[start..end]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_produces_requested_count() {
        let catalog = Catalog::generate(250, 1);
        assert_eq!(catalog.len(), 250);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn generate_is_deterministic_for_a_seed() {
        let a = Catalog::generate(50, 42);
        let b = Catalog::generate(50, 42);
        assert_eq!(a.products(), b.products());

        let c = Catalog::generate(50, 43);
        assert_ne!(a.products(), c.products());
    }

    #[test]
    fn generated_ids_are_unique() {
        let catalog = Catalog::generate(2_000, 5);
        let ids: HashSet<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 2_000);
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = Catalog::generate(0, 0);
        assert!(catalog.is_empty());
        assert!(catalog.slice(0, 20).is_empty());
    }

    #[test]
    fn slice_clamps_to_bounds() {
        let catalog = Catalog::generate(30, 9);

        assert_eq!(catalog.slice(0, 20).len(), 20);
        assert_eq!(catalog.slice(20, 20).len(), 10);
        assert!(catalog.slice(40, 20).is_empty());
        assert!(catalog.slice(usize::MAX, usize::MAX).is_empty());
        assert_eq!(catalog.slice(20, 20)[0], catalog.products()[20]);
    }
}
