//! Variant uniqueness validator.
//!
//! A template flagged `unique_variant` owns at most one variant, counting
//! inactive variants too. The check runs on the lookup of the enclosing
//! transaction, so it sees the batch being validated together with every
//! record already stored.

use std::collections::HashSet;

use forgeerp_core::DomainResult;
use forgeerp_products::{
    CatalogHooks, CatalogLookup, SearchContext, TemplateWrite, Variant, VariantFilter,
    VariantWrite,
};

use crate::config::{ConfigurationProvider, ProductConfiguration, default_unique_variant};
use crate::error::VariantUniqueError;
use crate::messages::{MessageCatalog, Translations};
use crate::template::{self, UniqueTemplate, UniqueVariant};
use crate::variant::unique_variant;

/// Forward the variant of every flagged template to [`validate_variants`].
pub fn validate_templates(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    templates: &[UniqueTemplate],
) -> Result<(), VariantUniqueError> {
    let variants: Vec<Variant> = templates
        .iter()
        .filter(|t| t.ext.unique_variant)
        .filter_map(|t| template::sole_variant(lookup, t))
        .collect();
    if variants.is_empty() {
        return Ok(());
    }
    validate_variants(lookup, &variants)
}

/// Reject a batch leaving two variants on one flagged template.
///
/// Fails when two variants of the batch share a flagged template, or when any
/// other stored variant, active or not, already belongs to one of them.
pub fn validate_variants(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    variants: &[Variant],
) -> Result<(), VariantUniqueError> {
    let mut seen = HashSet::new();
    let unique: Vec<&Variant> = variants
        .iter()
        .filter(|v| seen.insert(v.id))
        .filter(|v| unique_variant(lookup, v))
        .collect();
    if unique.is_empty() {
        return Ok(());
    }

    let templates: Vec<_> = unique.iter().map(|v| v.template).collect();
    let distinct: HashSet<_> = templates.iter().collect();
    if distinct.len() != templates.len() {
        tracing::debug!(batch = unique.len(), "batch shares a unique-variant template");
        return Err(VariantUniqueError::TemplateUniq);
    }

    let filter = VariantFilter::And(vec![
        VariantFilter::IdNotIn(unique.iter().map(|v| v.id).collect()),
        VariantFilter::TemplateIn(templates),
    ]);
    let clashing = lookup.search_variants(&filter, &SearchContext::with_inactive(), Some(1));
    if let Some(other) = clashing.first() {
        tracing::debug!(
            template = %other.template,
            existing = %other.id,
            "unique-variant template already has a variant"
        );
        return Err(VariantUniqueError::TemplateUniq);
    }
    Ok(())
}

/// Catalog hooks installing the unique-variant rules.
#[derive(Debug, Clone, Default)]
pub struct UniqueVariantValidator<C = ProductConfiguration, M = Translations> {
    config: C,
    messages: M,
}

impl<C, M> UniqueVariantValidator<C, M>
where
    C: ConfigurationProvider,
    M: MessageCatalog,
{
    pub fn new(config: C, messages: M) -> Self {
        Self { config, messages }
    }

    fn localize(&self, result: Result<(), VariantUniqueError>) -> DomainResult<()> {
        result.map_err(|err| err.localize(&self.messages))
    }
}

impl<C, M> CatalogHooks<UniqueVariant> for UniqueVariantValidator<C, M>
where
    C: ConfigurationProvider,
    M: MessageCatalog,
{
    fn default_extension(&self) -> UniqueVariant {
        UniqueVariant {
            unique_variant: default_unique_variant(&self.config),
        }
    }

    fn variants_size_limit(&self, template: &UniqueTemplate) -> Option<usize> {
        Some(template::variants_size_limit(template))
    }

    fn validate_templates(
        &self,
        lookup: &dyn CatalogLookup<UniqueVariant>,
        templates: &[UniqueTemplate],
    ) -> DomainResult<()> {
        self.localize(validate_templates(lookup, templates))
    }

    fn validate_variants(
        &self,
        lookup: &dyn CatalogLookup<UniqueVariant>,
        variants: &[Variant],
    ) -> DomainResult<()> {
        self.localize(validate_variants(lookup, variants))
    }

    fn after_template_write(
        &self,
        lookup: &dyn CatalogLookup<UniqueVariant>,
        before: &[UniqueTemplate],
        writes: &[TemplateWrite<UniqueVariant>],
    ) -> DomainResult<Vec<VariantWrite>> {
        Ok(template::on_write(lookup, before, writes))
    }
}
