//! Products domain module (catalog).
//!
//! Templates are abstract product definitions; variants are the concrete
//! sellable products attached to them. Modules that add fields to templates do
//! so through the [`TemplateExtension`] slot and hook into the record lifecycle
//! through [`CatalogHooks`]; storage is reached only through [`CatalogStore`].

pub mod catalog;
pub mod hooks;
pub mod query;
pub mod store;
pub mod template;
pub mod variant;

pub use catalog::Catalog;
pub use hooks::{CatalogHooks, NoHooks};
pub use query::{Direction, SearchContext, StrMatch, TemplateFilter, VariantFilter};
pub use store::{CatalogLookup, CatalogStore};
pub use template::{
    NewTemplate, Template, TemplateChanges, TemplateExtension, TemplateId, TemplateWrite,
};
pub use variant::{NewVariant, Variant, VariantChanges, VariantId, VariantWrite};
