use chrono::{DateTime, Utc};

use forgeerp_core::{DomainError, DomainResult};
use forgeerp_products::{
    CatalogLookup, CatalogStore, SearchContext, Template, TemplateExtension, TemplateFilter,
    TemplateId, Variant, VariantFilter, VariantId,
};

/// Creation/last-write timestamps of a stored record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    pub create_date: DateTime<Utc>,
    pub write_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Row<T> {
    record: T,
    meta: RecordMetadata,
}

impl<T> Row<T> {
    fn new(record: T) -> Self {
        Self {
            record,
            meta: RecordMetadata {
                create_date: Utc::now(),
                write_date: None,
            },
        }
    }

    fn replace(&mut self, record: T) {
        self.record = record;
        self.meta.write_date = Some(Utc::now());
    }
}

#[derive(Debug, Clone)]
struct Tables<X> {
    templates: Vec<Row<Template<X>>>,
    /// Insertion order is the association order of a template's variants.
    variants: Vec<Row<Variant>>,
}

impl<X> Default for Tables<X> {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            variants: Vec::new(),
        }
    }
}

/// In-memory catalog store with snapshot transactions.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryCatalogStore<X> {
    tables: Tables<X>,
    snapshot: Option<Tables<X>>,
}

impl<X> Default for InMemoryCatalogStore<X> {
    fn default() -> Self {
        Self {
            tables: Tables::default(),
            snapshot: None,
        }
    }
}

impl<X: TemplateExtension> InMemoryCatalogStore<X> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn template_metadata(&self, id: TemplateId) -> Option<RecordMetadata> {
        self.template_row(id).map(|row| row.meta)
    }

    pub fn variant_metadata(&self, id: VariantId) -> Option<RecordMetadata> {
        self.variant_row(id).map(|row| row.meta)
    }

    pub fn template_count(&self) -> usize {
        self.tables.templates.len()
    }

    pub fn variant_count(&self) -> usize {
        self.tables.variants.len()
    }

    fn template_row(&self, id: TemplateId) -> Option<&Row<Template<X>>> {
        self.tables.templates.iter().find(|row| row.record.id == id)
    }

    fn variant_row(&self, id: VariantId) -> Option<&Row<Variant>> {
        self.tables.variants.iter().find(|row| row.record.id == id)
    }
}

impl<X: TemplateExtension> CatalogLookup<X> for InMemoryCatalogStore<X> {
    fn template(&self, id: TemplateId) -> Option<Template<X>> {
        self.template_row(id).map(|row| row.record.clone())
    }

    fn variant(&self, id: VariantId) -> Option<Variant> {
        self.variant_row(id).map(|row| row.record.clone())
    }

    fn template_variants(&self, template: TemplateId, ctx: &SearchContext) -> Vec<Variant> {
        self.tables
            .variants
            .iter()
            .map(|row| &row.record)
            .filter(|v| v.template == template && ctx.admits(v.active))
            .cloned()
            .collect()
    }

    fn search_templates(
        &self,
        filter: &TemplateFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Template<X>> {
        self.tables
            .templates
            .iter()
            .map(|row| &row.record)
            .filter(|t| ctx.admits(t.active) && filter.matches(t, self, ctx))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    fn search_variants(
        &self,
        filter: &VariantFilter<X>,
        ctx: &SearchContext,
        limit: Option<usize>,
    ) -> Vec<Variant> {
        self.tables
            .variants
            .iter()
            .map(|row| &row.record)
            .filter(|v| ctx.admits(v.active) && filter.matches(v, self, ctx))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

impl<X: TemplateExtension> CatalogStore<X> for InMemoryCatalogStore<X> {
    fn insert_template(&mut self, template: Template<X>) -> DomainResult<()> {
        if self.template_row(template.id).is_some() {
            return Err(DomainError::conflict(format!(
                "template {} already exists",
                template.id
            )));
        }
        self.tables.templates.push(Row::new(template));
        Ok(())
    }

    fn update_template(&mut self, template: Template<X>) -> DomainResult<()> {
        let row = self
            .tables
            .templates
            .iter_mut()
            .find(|row| row.record.id == template.id)
            .ok_or_else(DomainError::not_found)?;
        row.replace(template);
        Ok(())
    }

    fn insert_variant(&mut self, variant: Variant) -> DomainResult<()> {
        if self.template_row(variant.template).is_none() {
            return Err(DomainError::invariant(format!(
                "variant {} references unknown template {}",
                variant.id, variant.template
            )));
        }
        if self.variant_row(variant.id).is_some() {
            return Err(DomainError::conflict(format!(
                "variant {} already exists",
                variant.id
            )));
        }
        self.tables.variants.push(Row::new(variant));
        Ok(())
    }

    fn update_variant(&mut self, variant: Variant) -> DomainResult<()> {
        let row = self
            .tables
            .variants
            .iter_mut()
            .find(|row| row.record.id == variant.id)
            .ok_or_else(DomainError::not_found)?;
        row.replace(variant);
        Ok(())
    }

    fn delete_variant(&mut self, id: VariantId) -> DomainResult<()> {
        let before = self.tables.variants.len();
        self.tables.variants.retain(|row| row.record.id != id);
        if self.tables.variants.len() == before {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn begin(&mut self) -> DomainResult<()> {
        if self.snapshot.is_some() {
            return Err(DomainError::conflict("a transaction is already open"));
        }
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> DomainResult<()> {
        self.snapshot
            .take()
            .map(|_| ())
            .ok_or_else(|| DomainError::invariant("commit without an open transaction"))
    }

    fn rollback(&mut self) {
        match self.snapshot.take() {
            Some(snapshot) => self.tables = snapshot,
            None => tracing::warn!("rollback without an open transaction"),
        }
    }
}
