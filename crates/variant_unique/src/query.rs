//! Query builders for the fields this module adds.
//!
//! List and search endpoints call these to turn a clause on a derived field
//! into a predicate over stored fields.

use std::cmp::Ordering;

use forgeerp_products::{CatalogLookup, Direction, StrMatch, TemplateFilter, VariantFilter};

use crate::template::{self, UniqueTemplate, UniqueVariant, UniqueVariantIs};

/// Variants whose template `unique_variant` equals `value`.
pub fn search_unique_variant(value: bool) -> VariantFilter<UniqueVariant> {
    VariantFilter::template(TemplateFilter::Extension(UniqueVariantIs(value)))
}

/// Flagged templates whose variant attributes match `clause`.
pub fn search_attributes_string(clause: StrMatch) -> TemplateFilter<UniqueVariant> {
    TemplateFilter::And(vec![
        TemplateFilter::Extension(UniqueVariantIs(true)),
        TemplateFilter::any_variant(VariantFilter::AttributesString(clause)),
    ])
}

/// Flagged templates whose variant code matches `clause`.
pub fn search_code(clause: StrMatch) -> TemplateFilter<UniqueVariant> {
    TemplateFilter::And(vec![
        TemplateFilter::Extension(UniqueVariantIs(true)),
        TemplateFilter::any_variant(VariantFilter::Code(clause)),
    ])
}

/// Sort templates by the code of their variant.
///
/// Only flagged templates have a code to sort on; the rest keep their relative
/// order after every template that has one.
pub fn order_by_code(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    templates: &mut [UniqueTemplate],
    direction: Direction,
) {
    let mut keyed: Vec<(Option<String>, UniqueTemplate)> = templates
        .iter()
        .map(|t| {
            let code = if t.ext.unique_variant {
                template::sole_variant(lookup, t).and_then(|v| v.code)
            } else {
                None
            };
            (code, t.clone())
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match direction {
            Direction::Asc => a.cmp(b),
            Direction::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    for (slot, (_, template)) in templates.iter_mut().zip(keyed) {
        *slot = template;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgeerp_infra::InMemoryCatalogStore;
    use forgeerp_products::{Catalog, NewTemplate, NewVariant, NoHooks, SearchContext};

    fn fixture() -> Catalog<UniqueVariant, InMemoryCatalogStore<UniqueVariant>, NoHooks> {
        let mut catalog = Catalog::new(InMemoryCatalogStore::new(), NoHooks);
        let flag = |unique_variant| UniqueVariant { unique_variant };
        catalog
            .create_templates(vec![
                NewTemplate::new("Plain")
                    .with_ext(flag(false))
                    .with_variant(NewVariant::with_suffix("A").with_attribute("color", "red")),
                NewTemplate::new("Zeta")
                    .with_ext(flag(true))
                    .with_variant(NewVariant::with_suffix("Z").with_attribute("color", "red")),
                NewTemplate::new("Beta")
                    .with_ext(flag(true))
                    .with_variant(NewVariant::with_suffix("B").with_attribute("color", "blue")),
            ])
            .unwrap();
        catalog
    }

    #[test]
    fn unique_variant_search_goes_through_the_template() {
        let catalog = fixture();
        let flagged =
            catalog.search_variants(&search_unique_variant(true), &SearchContext::default(), None);
        let codes: Vec<_> = flagged.iter().filter_map(|v| v.code.as_deref()).collect();
        assert_eq!(codes, vec!["Z", "B"]);

        let plain =
            catalog.search_variants(&search_unique_variant(false), &SearchContext::default(), None);
        assert_eq!(plain.len(), 1);
    }

    #[test]
    fn attributes_search_only_returns_flagged_templates() {
        let catalog = fixture();
        let found = catalog.search_templates(
            &search_attributes_string(StrMatch::ILike("%red%".to_string())),
            &SearchContext::default(),
            None,
        );
        let names: Vec<_> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta"]);
    }

    #[test]
    fn code_search_matches_the_variant_code() {
        let catalog = fixture();
        let found = catalog.search_templates(
            &search_code(StrMatch::Eq("B".to_string())),
            &SearchContext::default(),
            None,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Beta");
    }

    #[test]
    fn ordering_by_code_puts_templates_without_code_last() {
        let catalog = fixture();
        let mut templates =
            catalog.search_templates(&TemplateFilter::All, &SearchContext::default(), None);

        order_by_code(catalog.store(), &mut templates, Direction::Asc);
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Zeta", "Plain"]);

        order_by_code(catalog.store(), &mut templates, Direction::Desc);
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Beta", "Plain"]);
    }
}
