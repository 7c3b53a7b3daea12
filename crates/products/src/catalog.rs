//! Catalog orchestration: record lifecycle on top of a [`CatalogStore`].
//!
//! Every mutating call runs in one store transaction:
//!
//! ```text
//! begin
//!   ↓
//! apply writes (templates, nested variants, derived codes)
//!   ↓
//! hooks: follow-up writes, then size limits and cross-record validation
//!   ↓
//! commit  (or rollback on the first error)
//! ```
//!
//! Nothing is partially applied: a failed validation leaves the store exactly
//! as it was before the call.

use std::collections::HashSet;
use std::marker::PhantomData;

use forgeerp_core::{DomainError, DomainResult};

use crate::hooks::CatalogHooks;
use crate::query::{SearchContext, TemplateFilter, VariantFilter};
use crate::store::CatalogStore;
use crate::template::{NewTemplate, Template, TemplateExtension, TemplateId, TemplateWrite};
use crate::variant::{NewVariant, Variant, VariantId, VariantWrite};

/// Catalog service composing a store and the installed module hooks.
#[derive(Debug)]
pub struct Catalog<X, S, H> {
    store: S,
    hooks: H,
    _ext: PhantomData<fn() -> X>,
}

impl<X, S, H> Catalog<X, S, H>
where
    X: TemplateExtension,
    S: CatalogStore<X>,
    H: CatalogHooks<X>,
{
    pub fn new(store: S, hooks: H) -> Self {
        Self {
            store,
            hooks,
            _ext: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn template(&self, id: TemplateId) -> Option<Template<X>> {
        self.store.template(id)
    }

    pub fn variant(&self, id: VariantId) -> Option<Variant> {
        self.store.variant(id)
    }

    pub fn template_variants(&self, id: TemplateId, ctx: &SearchContext) -> Vec<Variant> {
        self.store.template_variants(id, ctx)
    }

    pub fn search_templates(
        &self,
        filter: &TemplateFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Template<X>> {
        self.store.search_templates(filter, ctx, limit)
    }

    pub fn search_variants(
        &self,
        filter: &VariantFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Variant> {
        self.store.search_variants(filter, ctx, limit)
    }

    /// Create templates together with their nested variants.
    pub fn create_templates(
        &mut self,
        values: Vec<NewTemplate<X>>,
    ) -> DomainResult<Vec<TemplateId>> {
        self.in_transaction("create_templates", |store, hooks| {
            let mut templates = Vec::with_capacity(values.len());
            let mut variants = Vec::new();

            for value in values {
                let template = Template {
                    id: TemplateId::new(),
                    name: value.name,
                    prefix_code: value.prefix_code,
                    active: value.active,
                    ext: value.ext.unwrap_or_else(|| hooks.default_extension()),
                };
                store.insert_template(template.clone())?;

                for nested in &value.variants {
                    variants.push(Self::insert_variant(store, &template, nested)?);
                }
                templates.push(template);
            }

            Self::validate(store, hooks, &templates, &variants)?;
            Ok(templates.iter().map(|t| t.id).collect())
        })
    }

    /// Apply template writes, then the follow-up variant writes the hooks ask for.
    pub fn write_templates(&mut self, writes: Vec<TemplateWrite<X>>) -> DomainResult<()> {
        self.in_transaction("write_templates", |store, hooks| {
            let mut before = Vec::new();
            let mut seen = HashSet::new();
            for write in &writes {
                for id in &write.ids {
                    let template = store.template(*id).ok_or_else(DomainError::not_found)?;
                    if seen.insert(*id) {
                        before.push(template);
                    }
                }
            }

            let mut variants = Vec::new();
            for write in &writes {
                for id in &write.ids {
                    let mut template = store.template(*id).ok_or_else(DomainError::not_found)?;
                    let old_prefix = template.prefix_code.clone();
                    write.changes.apply_to(&mut template);
                    store.update_template(template.clone())?;

                    if template.prefix_code != old_prefix {
                        for mut variant in
                            store.template_variants(template.id, &SearchContext::with_inactive())
                        {
                            variant.refresh_code(template.prefix_code.as_deref());
                            store.update_variant(variant)?;
                        }
                    }

                    for nested in &write.changes.add_variants {
                        variants.push(Self::insert_variant(store, &template, nested)?);
                    }
                }
            }

            let follow_ups = hooks.after_template_write(&*store, &before, &writes)?;
            if !follow_ups.is_empty() {
                tracing::debug!(batches = follow_ups.len(), "applying follow-up variant writes");
            }
            variants.extend(Self::apply_variant_writes(store, &follow_ups)?);

            let after: Vec<Template<X>> =
                before.iter().filter_map(|t| store.template(t.id)).collect();
            Self::validate(store, hooks, &after, &variants)
        })
    }

    /// Create variants attached to existing templates.
    pub fn create_variants(
        &mut self,
        values: Vec<(TemplateId, NewVariant)>,
    ) -> DomainResult<Vec<VariantId>> {
        self.in_transaction("create_variants", |store, hooks| {
            let mut variants = Vec::with_capacity(values.len());
            for (template_id, value) in &values {
                let template = store
                    .template(*template_id)
                    .ok_or_else(DomainError::not_found)?;
                variants.push(Self::insert_variant(store, &template, value)?);
            }

            Self::validate(store, hooks, &[], &variants)?;
            Ok(variants.iter().map(|v| v.id).collect())
        })
    }

    pub fn write_variants(&mut self, writes: Vec<VariantWrite>) -> DomainResult<()> {
        self.in_transaction("write_variants", |store, hooks| {
            let variants = Self::apply_variant_writes(store, &writes)?;
            Self::validate(store, hooks, &[], &variants)
        })
    }

    pub fn delete_variants(&mut self, ids: Vec<VariantId>) -> DomainResult<()> {
        self.in_transaction("delete_variants", |store, _hooks| {
            for id in ids {
                store.delete_variant(id)?;
            }
            Ok(())
        })
    }

    fn in_transaction<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut S, &H) -> DomainResult<T>,
    ) -> DomainResult<T> {
        self.store.begin()?;
        match f(&mut self.store, &self.hooks) {
            Ok(value) => {
                self.store.commit()?;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(operation, error = %err, "catalog write rejected; rolling back");
                self.store.rollback();
                Err(err)
            }
        }
    }

    fn insert_variant(
        store: &mut S,
        template: &Template<X>,
        values: &NewVariant,
    ) -> DomainResult<Variant> {
        let variant = Variant::new(
            VariantId::new(),
            template.id,
            values,
            template.prefix_code.as_deref(),
        );
        store.insert_variant(variant.clone())?;
        Ok(variant)
    }

    /// Apply variant writes, returning each touched variant once in its final state.
    fn apply_variant_writes(store: &mut S, writes: &[VariantWrite]) -> DomainResult<Vec<Variant>> {
        let mut touched: Vec<Variant> = Vec::new();
        for write in writes {
            for id in &write.ids {
                let mut variant = store.variant(*id).ok_or_else(DomainError::not_found)?;
                write.changes.apply_to(&mut variant);

                let template = store.template(variant.template).ok_or_else(|| {
                    DomainError::invariant(format!(
                        "variant {} references unknown template {}",
                        variant.id, variant.template
                    ))
                })?;
                variant.refresh_code(template.prefix_code.as_deref());
                store.update_variant(variant.clone())?;

                touched.retain(|v| v.id != variant.id);
                touched.push(variant);
            }
        }
        Ok(touched)
    }

    fn validate(
        store: &S,
        hooks: &H,
        templates: &[Template<X>],
        variants: &[Variant],
    ) -> DomainResult<()> {
        for template in templates {
            if let Some(limit) = hooks.variants_size_limit(template) {
                let count = store
                    .template_variants(template.id, &SearchContext::default())
                    .len();
                if count > limit {
                    return Err(DomainError::validation(format!(
                        "\"{}\" can hold at most {limit} variant(s), found {count}",
                        template.rec_name()
                    )));
                }
            }
        }

        if !templates.is_empty() {
            hooks.validate_templates(store, templates)?;
        }
        if !variants.is_empty() {
            hooks.validate_variants(store, variants)?;
        }
        Ok(())
    }
}
