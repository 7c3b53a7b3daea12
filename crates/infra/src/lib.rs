//! Infrastructure layer: storage adapters behind the domain traits.

pub mod catalog_store;

pub use catalog_store::{InMemoryCatalogStore, RecordMetadata};
