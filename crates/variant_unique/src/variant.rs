//! Variant side: the derived `unique_variant` flag.

use forgeerp_products::{CatalogLookup, TemplateId, Variant};

use crate::template::UniqueVariant;

/// Live form value of a variant's `unique_variant`: its template's flag.
///
/// `None` while no template is set.
pub fn on_change_with_unique_variant(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    template: Option<TemplateId>,
) -> Option<bool> {
    let template = lookup.template(template?)?;
    Some(template.ext.unique_variant)
}

/// Stored-record value of `unique_variant`.
pub fn unique_variant(lookup: &dyn CatalogLookup<UniqueVariant>, variant: &Variant) -> bool {
    on_change_with_unique_variant(lookup, Some(variant.template)).unwrap_or(false)
}
