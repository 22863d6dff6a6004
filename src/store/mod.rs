//! Key-value persistence.
//!
//! Everything the app remembers between runs is a string stored under one of
//! a handful of keys (see [`keys`]).  Values are JSON documents; encoding and
//! decoding them is the caller's job, the store only moves strings.
//!
//! ## For contributors
//!
//! Two backends implement [`KeyValueStore`]:
//!
//! * [`FileStore`] — a single JSON object on disk, used by the binary.
//! * [`MemoryStore`] — a `HashMap`, used as the test double everywhere.
//!
//! There are no transactional guarantees across keys.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// The registered account: `{nome, email, senha, telefone?, foto?}`.
    pub const REGISTERED_USER: &str = "usuarioCadastrado";
    /// Snapshot of the currently logged-in account.
    pub const SESSION_USER: &str = "usuario";
    /// JSON array of user-submitted products, in submission order.
    pub const USER_PRODUCTS: &str = "produtosUser";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string-keyed get/set/remove service.
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`.  Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
