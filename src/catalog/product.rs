//! The product record shared by the catalog, the feed and the store.
//!
//! `Product` is the single item type for both catalog-generated entries and
//! user-submitted ones.  Its serialized form uses the field names of the
//! persisted `produtosUser` array (`nome`, `preco`, `descricao`, `imagem`) so
//! that values written by earlier versions of the app load unchanged.

use serde::{Deserialize, Serialize};

/// A single storefront product.
///
/// Immutable once created: catalog items never change, and user-submitted
/// items are appended to the persisted list and never edited.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    ///
    /// Catalog items carry a UUID; user-submitted items carry the submission
    /// time in epoch milliseconds.
    pub id: String,

    /// Display name.
    #[serde(rename = "nome")]
    pub name: String,

    /// Price, already formatted for display (e.g. `R$ 129,90`).
    #[serde(rename = "preco")]
    pub price: String,

    /// Optional longer description.
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image URI (remote URL for catalog items, local path for submissions).
    #[serde(rename = "imagem")]
    pub image: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
