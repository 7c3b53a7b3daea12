//! Unique product variants.
//!
//! Lets a product template be flagged `unique_variant`, turning the
//! template/variant relation from one-to-many into one-to-one:
//!
//! - a flagged template holds at most one variant, inactive ones included;
//! - the template's `code` and `attributes_string` read through to that variant;
//! - (de)activating a flagged template (de)activates its variant;
//! - the BOM tree wizards opened on a flagged template open on its variant.
//!
//! The rules plug into the host catalog as [`UniqueVariantValidator`], an
//! implementation of [`forgeerp_products::CatalogHooks`].

pub mod actions;
pub mod config;
pub mod error;
pub mod messages;
pub mod query;
pub mod template;
pub mod validator;
pub mod variant;
pub mod views;

use forgeerp_products::{Catalog, CatalogStore};

pub use actions::{UniqueVariantOpenBomTree, UniqueVariantOpenReverseBomTree};
pub use config::{ConfigError, ConfigurationProvider, ProductConfiguration, default_unique_variant};
pub use error::VariantUniqueError;
pub use messages::{MessageCatalog, NOT_PRODUCT_VARIANT, TEMPLATE_UNIQ, Translations};
pub use template::{
    UNBOUNDED_VARIANTS, UniqueTemplate, UniqueVariant, UniqueVariantChanges, UniqueVariantIs,
    get_attributes_string, get_code, on_write, sole_variant, variants_size_limit,
};
pub use validator::{UniqueVariantValidator, validate_templates, validate_variants};
pub use variant::{on_change_with_unique_variant, unique_variant};

/// Catalog over `store` with the unique-variant rules installed.
pub fn catalog<S, C, M>(
    store: S,
    config: C,
    messages: M,
) -> Catalog<UniqueVariant, S, UniqueVariantValidator<C, M>>
where
    S: CatalogStore<UniqueVariant>,
    C: ConfigurationProvider,
    M: MessageCatalog,
{
    Catalog::new(store, UniqueVariantValidator::new(config, messages))
}
