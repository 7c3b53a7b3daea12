//! Template side: the `unique_variant` flag and the fields read through to
//! the single variant.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use forgeerp_products::{
    CatalogLookup, SearchContext, Template, TemplateExtension, TemplateId, TemplateWrite,
    Variant, VariantChanges, VariantId, VariantWrite,
};

/// Variant collection size of templates that are not flagged.
pub const UNBOUNDED_VARIANTS: usize = 9_999_999;

/// Fields this module adds to templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueVariant {
    pub unique_variant: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniqueVariantChanges {
    pub unique_variant: Option<bool>,
}

impl UniqueVariantChanges {
    pub fn set(unique_variant: bool) -> Self {
        Self {
            unique_variant: Some(unique_variant),
        }
    }
}

/// Matches templates whose flag equals the wrapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueVariantIs(pub bool);

impl TemplateExtension for UniqueVariant {
    type Changes = UniqueVariantChanges;
    type Predicate = UniqueVariantIs;

    fn apply(&mut self, changes: &Self::Changes) {
        if let Some(flag) = changes.unique_variant {
            self.unique_variant = flag;
        }
    }

    fn matches(&self, predicate: &Self::Predicate) -> bool {
        self.unique_variant == predicate.0
    }
}

pub type UniqueTemplate = Template<UniqueVariant>;

/// Allowed size of the template's variant collection.
pub fn variants_size_limit(template: &UniqueTemplate) -> usize {
    if template.ext.unique_variant {
        1
    } else {
        UNBOUNDED_VARIANTS
    }
}

/// "The" variant of a template: first in association order, inactive included.
pub fn sole_variant(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    template: &UniqueTemplate,
) -> Option<Variant> {
    lookup
        .template_variants(template.id, &SearchContext::with_inactive())
        .into_iter()
        .next()
}

fn read_through(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    templates: &[UniqueTemplate],
    field: impl Fn(&Variant) -> Option<String>,
) -> HashMap<TemplateId, Option<String>> {
    templates
        .iter()
        .map(|template| {
            let value = if template.ext.unique_variant {
                lookup
                    .template_variants(template.id, &SearchContext::with_inactive())
                    .iter()
                    .find(|v| v.active)
                    .and_then(&field)
            } else {
                None
            };
            (template.id, value)
        })
        .collect()
}

/// Template `code`: the code of the first active variant of a flagged template.
///
/// A flagged template without any active variant reads as `None`.
pub fn get_code(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    templates: &[UniqueTemplate],
) -> HashMap<TemplateId, Option<String>> {
    read_through(lookup, templates, |v| v.code.clone())
}

/// Template `attributes_string`, read through like [`get_code`].
pub fn get_attributes_string(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    templates: &[UniqueTemplate],
) -> HashMap<TemplateId, Option<String>> {
    read_through(lookup, templates, Variant::attributes_string)
}

/// Follow-up writes keeping variants' `active` in step with flagged templates.
///
/// Applies to templates flagged before or after the write. Produces at most one
/// activate batch and one deactivate batch; when a template appears in several
/// writes the last `active` value wins.
pub fn on_write(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    before: &[UniqueTemplate],
    writes: &[TemplateWrite<UniqueVariant>],
) -> Vec<VariantWrite> {
    let mut target: BTreeMap<VariantId, bool> = BTreeMap::new();
    let mut order: Vec<VariantId> = Vec::new();

    for write in writes {
        let Some(active) = write.changes.active else {
            continue;
        };
        for id in &write.ids {
            let was_unique = before
                .iter()
                .find(|t| t.id == *id)
                .is_some_and(|t| t.ext.unique_variant);
            let is_unique = lookup
                .template(*id)
                .is_some_and(|t| t.ext.unique_variant);
            if !(was_unique || is_unique) {
                continue;
            }

            for variant in lookup.template_variants(*id, &SearchContext::with_inactive()) {
                if target.insert(variant.id, active).is_none() {
                    order.push(variant.id);
                }
            }
        }
    }

    let (to_activate, to_deactivate): (Vec<VariantId>, Vec<VariantId>) =
        order.into_iter().partition(|id| target[id]);

    let mut follow_ups = Vec::with_capacity(2);
    if !to_activate.is_empty() {
        follow_ups.push(VariantWrite::new(to_activate, VariantChanges::active(true)));
    }
    if !to_deactivate.is_empty() {
        follow_ups.push(VariantWrite::new(to_deactivate, VariantChanges::active(false)));
    }
    follow_ups
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgeerp_infra::InMemoryCatalogStore;
    use forgeerp_products::{Catalog, NewTemplate, NewVariant, NoHooks, TemplateChanges};

    type Bare = Catalog<UniqueVariant, InMemoryCatalogStore<UniqueVariant>, NoHooks>;

    fn flagged(flag: bool) -> UniqueVariant {
        UniqueVariant {
            unique_variant: flag,
        }
    }

    fn bare() -> Bare {
        Catalog::new(InMemoryCatalogStore::new(), NoHooks)
    }

    #[test]
    fn size_limit_follows_the_flag() {
        let mut catalog = bare();
        let ids = catalog
            .create_templates(vec![
                NewTemplate::new("A").with_ext(flagged(false)),
                NewTemplate::new("B").with_ext(flagged(true)),
            ])
            .unwrap();

        let a = catalog.template(ids[0]).unwrap();
        let b = catalog.template(ids[1]).unwrap();
        assert_eq!(variants_size_limit(&a), UNBOUNDED_VARIANTS);
        assert_eq!(variants_size_limit(&b), 1);
    }

    #[test]
    fn code_reads_through_only_for_flagged_templates() {
        let mut catalog = bare();
        let ids = catalog
            .create_templates(vec![
                NewTemplate::new("A")
                    .with_ext(flagged(false))
                    .with_variant(NewVariant::with_suffix("1")),
                NewTemplate::new("B")
                    .with_ext(flagged(true))
                    .with_variant(NewVariant::with_suffix("2").with_attribute("size", "M")),
            ])
            .unwrap();
        let templates: Vec<_> = ids.iter().filter_map(|id| catalog.template(*id)).collect();

        let codes = get_code(catalog.store(), &templates);
        assert_eq!(codes[&ids[0]], None);
        assert_eq!(codes[&ids[1]].as_deref(), Some("2"));

        let attributes = get_attributes_string(catalog.store(), &templates);
        assert_eq!(attributes[&ids[0]], None);
        assert_eq!(attributes[&ids[1]].as_deref(), Some("size:M"));
    }

    #[test]
    fn code_skips_inactive_variants_and_may_be_empty() {
        let mut catalog = bare();
        let ids = catalog
            .create_templates(vec![
                NewTemplate::new("B")
                    .with_ext(flagged(true))
                    .with_variant(NewVariant::with_suffix("old").inactive()),
            ])
            .unwrap();
        let template = catalog.template(ids[0]).unwrap();

        assert_eq!(get_code(catalog.store(), &[template.clone()])[&ids[0]], None);
        assert_eq!(
            sole_variant(catalog.store(), &template).and_then(|v| v.code).as_deref(),
            Some("old")
        );
    }

    #[test]
    fn on_write_ignores_writes_without_active_change() {
        let mut catalog = bare();
        let ids = catalog
            .create_templates(vec![
                NewTemplate::new("B")
                    .with_ext(flagged(true))
                    .with_variant(NewVariant::with_suffix("2")),
            ])
            .unwrap();
        let before = vec![catalog.template(ids[0]).unwrap()];
        let writes = vec![TemplateWrite::new(
            ids.clone(),
            TemplateChanges {
                name: Some("B2".to_string()),
                ..TemplateChanges::default()
            },
        )];

        assert!(on_write(catalog.store(), &before, &writes).is_empty());
    }

    #[test]
    fn on_write_partitions_into_two_batches() {
        let mut catalog = bare();
        let ids = catalog
            .create_templates(vec![
                NewTemplate::new("U1")
                    .with_ext(flagged(true))
                    .with_variant(NewVariant::with_suffix("1")),
                NewTemplate::new("U2")
                    .with_ext(flagged(true))
                    .with_variant(NewVariant::with_suffix("2").inactive()),
                NewTemplate::new("U3")
                    .with_ext(flagged(true))
                    .with_variant(NewVariant::with_suffix("3")),
                NewTemplate::new("Plain")
                    .with_ext(flagged(false))
                    .with_variant(NewVariant::with_suffix("4")),
            ])
            .unwrap();
        let before: Vec<_> = ids.iter().filter_map(|id| catalog.template(*id)).collect();
        let writes = vec![
            TemplateWrite::new(vec![ids[0], ids[2], ids[3]], TemplateChanges::active(false)),
            TemplateWrite::new(vec![ids[1]], TemplateChanges::active(true)),
        ];

        let follow_ups = on_write(catalog.store(), &before, &writes);

        assert_eq!(follow_ups.len(), 2);
        assert_eq!(follow_ups[0].changes, VariantChanges::active(true));
        assert_eq!(follow_ups[0].ids.len(), 1);
        assert_eq!(follow_ups[1].changes, VariantChanges::active(false));
        assert_eq!(follow_ups[1].ids.len(), 2);
    }

    #[test]
    fn on_write_covers_templates_that_were_flagged() {
        let mut catalog = bare();
        let ids = catalog
            .create_templates(vec![
                NewTemplate::new("Was")
                    .with_ext(flagged(true))
                    .with_variant(NewVariant::with_suffix("1")),
            ])
            .unwrap();
        let before = vec![catalog.template(ids[0]).unwrap()];
        catalog
            .write_templates(vec![TemplateWrite::new(
                ids.clone(),
                TemplateChanges::ext(UniqueVariantChanges::set(false)),
            )])
            .unwrap();

        let writes = vec![TemplateWrite::new(ids.clone(), TemplateChanges::active(false))];
        let follow_ups = on_write(catalog.store(), &before, &writes);
        assert_eq!(follow_ups.len(), 1);
        assert_eq!(follow_ups[0].changes.active, Some(false));
    }
}
