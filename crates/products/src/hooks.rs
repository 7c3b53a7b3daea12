//! Record lifecycle seam for modules extending the catalog.

use forgeerp_core::DomainResult;

use crate::store::CatalogLookup;
use crate::template::{Template, TemplateExtension, TemplateWrite};
use crate::variant::{Variant, VariantWrite};

/// Hooks run by [`crate::Catalog`] inside the write transaction.
///
/// Every method has a no-op default so a module only overrides the points it
/// cares about. Returning an error aborts the whole transaction.
pub trait CatalogHooks<X: TemplateExtension> {
    /// Extension values for templates created without explicit ones.
    fn default_extension(&self) -> X {
        X::default()
    }

    /// Maximum number of active variants the template may hold, `None` for unbounded.
    fn variants_size_limit(&self, _template: &Template<X>) -> Option<usize> {
        None
    }

    /// Cross-record validation of created/written templates.
    fn validate_templates(
        &self,
        _lookup: &dyn CatalogLookup<X>,
        _templates: &[Template<X>],
    ) -> DomainResult<()> {
        Ok(())
    }

    /// Cross-record validation of created/written variants.
    fn validate_variants(
        &self,
        _lookup: &dyn CatalogLookup<X>,
        _variants: &[Variant],
    ) -> DomainResult<()> {
        Ok(())
    }

    /// Follow-up variant writes once `writes` have been applied.
    ///
    /// `before` holds the written templates as they were prior to the write.
    fn after_template_write(
        &self,
        _lookup: &dyn CatalogLookup<X>,
        _before: &[Template<X>],
        _writes: &[TemplateWrite<X>],
    ) -> DomainResult<Vec<VariantWrite>> {
        Ok(Vec::new())
    }
}

/// The bare host catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl<X: TemplateExtension> CatalogHooks<X> for NoHooks {}

impl<X, H> CatalogHooks<X> for std::sync::Arc<H>
where
    X: TemplateExtension,
    H: CatalogHooks<X> + ?Sized,
{
    fn default_extension(&self) -> X {
        (**self).default_extension()
    }

    fn variants_size_limit(&self, template: &Template<X>) -> Option<usize> {
        (**self).variants_size_limit(template)
    }

    fn validate_templates(
        &self,
        lookup: &dyn CatalogLookup<X>,
        templates: &[Template<X>],
    ) -> DomainResult<()> {
        (**self).validate_templates(lookup, templates)
    }

    fn validate_variants(
        &self,
        lookup: &dyn CatalogLookup<X>,
        variants: &[Variant],
    ) -> DomainResult<()> {
        (**self).validate_variants(lookup, variants)
    }

    fn after_template_write(
        &self,
        lookup: &dyn CatalogLookup<X>,
        before: &[Template<X>],
        writes: &[TemplateWrite<X>],
    ) -> DomainResult<Vec<VariantWrite>> {
        (**self).after_template_write(lookup, before, writes)
    }
}
