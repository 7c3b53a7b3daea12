//! Catalog storage adapters.
//!
//! Implementations of [`forgeerp_products::CatalogStore`]. Each one keeps the
//! variants of a template in insertion order and provides the transaction
//! boundary the catalog runs its writes and validations in.

pub mod in_memory;

pub use in_memory::{InMemoryCatalogStore, RecordMetadata};
