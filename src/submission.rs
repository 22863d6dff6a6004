//! User-submitted products.
//!
//! The "add product" screen collects a name, price, description and an image
//! URI, then appends a new [`Product`] to the JSON array stored under
//! [`keys::USER_PRODUCTS`].  The feed's "Added" view reads the same array
//! back through [`load`].

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::Product;
use crate::store::{keys, KeyValueStore, StoreError};

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Fill in every field and attach a photo.")]
    MissingFields,

    #[error("Saved products are unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The fields of the add-product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub description: String,
    /// URI of the captured photo.
    pub image: String,
}

impl NewProduct {
    fn is_complete(&self) -> bool {
        [&self.name, &self.price, &self.description, &self.image]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Read every submitted product, in submission order.
///
/// A missing key or a blank value is an empty list.  Malformed JSON is reported as
/// [`SubmitError::Corrupt`].
pub fn load(store: &dyn KeyValueStore) -> Result<Vec<Product>, SubmitError> {
    match store.get(keys::USER_PRODUCTS)? {
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str(&text)?),
        None => Ok(Vec::new()),
    }
}

/// Validate `form` and append it to the persisted list.
///
/// The new product's id is `now` in epoch milliseconds.  Nothing is written
/// when validation fails or the existing list cannot be parsed.
pub fn save(
    store: &mut dyn KeyValueStore,
    form: &NewProduct,
    now: DateTime<Utc>,
) -> Result<Product, SubmitError> {
    if !form.is_complete() {
        return Err(SubmitError::MissingFields);
    }

    let product = Product {
        id: now.timestamp_millis().to_string(),
        name: form.name.trim().to_string(),
        price: form.price.trim().to_string(),
        description: Some(form.description.trim().to_string()),
        image: form.image.trim().to_string(),
    };

    let mut products = load(store)?;
    products.push(product.clone());
    store.set(keys::USER_PRODUCTS, &serde_json::to_string(&products)?)?;

    tracing::info!(id = %product.id, total = products.len(), "product submitted");
    Ok(product)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn form(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: "R$ 99,90".to_string(),
            description: "Hand made".to_string(),
            image: "file:///tmp/photo.jpg".to_string(),
        }
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn load_missing_key_is_empty() {
        let store = MemoryStore::new();
        assert!(load(&store).unwrap().is_empty());
    }

    #[test]
    fn save_appends_in_submission_order() {
        let mut store = MemoryStore::new();
        save(&mut store, &form("First"), at(1_000)).unwrap();
        save(&mut store, &form("Second"), at(2_000)).unwrap();

        let products = load(&store).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "First");
        assert_eq!(products[0].id, "1000");
        assert_eq!(products[1].name, "Second");
        assert_eq!(products[1].id, "2000");
    }

    #[test]
    fn save_rejects_incomplete_form() {
        let mut store = MemoryStore::new();

        let mut no_photo = form("Lamp");
        no_photo.image.clear();
        assert!(matches!(save(&mut store, &no_photo, at(1)), Err(SubmitError::MissingFields)));

        let mut blank_name = form("   ");
        blank_name.price = "R$ 1,00".into();
        assert!(matches!(save(&mut store, &blank_name, at(1)), Err(SubmitError::MissingFields)));

        assert_eq!(store.get(keys::USER_PRODUCTS).unwrap(), None);
    }

    #[test]
    fn save_does_not_overwrite_corrupt_list() {
        let mut store = MemoryStore::new();
        store.set(keys::USER_PRODUCTS, "[{broken").unwrap();

        assert!(matches!(save(&mut store, &form("X"), at(1)), Err(SubmitError::Corrupt(_))));
        assert_eq!(store.get(keys::USER_PRODUCTS).unwrap().as_deref(), Some("[{broken"));
    }
}
