//! Persistent item state.
//!
//! A [`StateStore`] is a flat key/field store: each item id maps to a set of
//! text fields. Writes replace the whole record for a key atomically, so a
//! concurrent reader sees either the old record or the new one. [`StateStore::update`]
//! makes a read-modify-write of one key atomic as well.
//!
//! [`ItemRepository`] layers typed [`Item`](crate::item::Item) access on top.

mod repository;
mod sqlite;

pub use repository::ItemRepository;
pub use sqlite::SqliteStateStore;

use std::collections::BTreeMap;

use thiserror::Error;

/// Flat field map stored under one item id.
pub type Record = BTreeMap<String, String>;

/// Read-modify-write step for [`StateStore::update`].
///
/// Receives the current record (if any) and returns the record to store, or
/// `None` to leave the key untouched.
pub type RecordUpdate<'a> =
    Box<dyn FnOnce(Option<Record>) -> Result<Option<Record>, StoreError> + 'a>;

/// Errors from state storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record for {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for key/field state storage.
pub trait StateStore: Send + Sync {
    /// Read the record stored under `id`, if any.
    fn get(&self, id: &str) -> Result<Option<Record>, StoreError>;

    /// Replace the record stored under `id` with `record`.
    fn set(&self, id: &str, record: &Record) -> Result<(), StoreError>;

    /// Atomically apply `update` to the record stored under `id`.
    ///
    /// No other write to `id` can land between the read and the write. Returns
    /// whether a record was written.
    fn update(&self, id: &str, update: RecordUpdate<'_>) -> Result<bool, StoreError>;

    /// All ids with a stored record, in lexicographic order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
