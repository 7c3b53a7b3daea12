//! Persistence collaborator seen by the catalog.

use forgeerp_core::DomainResult;

use crate::query::{SearchContext, TemplateFilter, VariantFilter};
use crate::template::{Template, TemplateExtension, TemplateId};
use crate::variant::{Variant, VariantId};

/// Read side of the catalog storage.
///
/// Reads see the writes of the enclosing transaction.
pub trait CatalogLookup<X: TemplateExtension> {
    /// Fetch a template by id, regardless of its `active` flag.
    fn template(&self, id: TemplateId) -> Option<Template<X>>;

    /// Fetch a variant by id, regardless of its `active` flag.
    fn variant(&self, id: VariantId) -> Option<Variant>;

    /// Variants of a template in insertion order, filtered by `ctx`.
    fn template_variants(&self, template: TemplateId, ctx: &SearchContext) -> Vec<Variant>;

    fn search_templates(
        &self,
        filter: &TemplateFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Template<X>>;

    fn search_variants(
        &self,
        filter: &VariantFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Variant>;
}

/// Write side of the catalog storage, including the transaction boundary.
pub trait CatalogStore<X: TemplateExtension>: CatalogLookup<X> {
    fn insert_template(&mut self, template: Template<X>) -> DomainResult<()>;

    fn update_template(&mut self, template: Template<X>) -> DomainResult<()>;

    fn insert_variant(&mut self, variant: Variant) -> DomainResult<()>;

    fn update_variant(&mut self, variant: Variant) -> DomainResult<()>;

    fn delete_variant(&mut self, id: VariantId) -> DomainResult<()>;

    fn begin(&mut self) -> DomainResult<()>;

    fn commit(&mut self) -> DomainResult<()>;

    /// Discard every write since `begin`.
    fn rollback(&mut self);
}

impl<X, T> CatalogLookup<X> for &T
where
    X: TemplateExtension,
    T: CatalogLookup<X> + ?Sized,
{
    fn template(&self, id: TemplateId) -> Option<Template<X>> {
        (**self).template(id)
    }

    fn variant(&self, id: VariantId) -> Option<Variant> {
        (**self).variant(id)
    }

    fn template_variants(&self, template: TemplateId, ctx: &SearchContext) -> Vec<Variant> {
        (**self).template_variants(template, ctx)
    }

    fn search_templates(
        &self,
        filter: &TemplateFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Template<X>> {
        (**self).search_templates(filter, ctx, limit)
    }

    fn search_variants(
        &self,
        filter: &VariantFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Variant> {
        (**self).search_variants(filter, ctx, limit)
    }
}
