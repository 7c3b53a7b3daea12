//! Search predicates over templates and variants.
//!
//! Filters are plain values built by query-builder functions and evaluated by
//! the store against a [`CatalogLookup`], so predicates that cross the
//! template/variant association can resolve the other side.

use forgeerp_core::ValueObject;

use crate::store::CatalogLookup;
use crate::template::{Template, TemplateExtension, TemplateId};
use crate::variant::{Variant, VariantId};

/// Transaction-scoped search context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchContext {
    /// When set, inactive records are filtered out.
    pub active_test: bool,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self { active_test: true }
    }
}

impl SearchContext {
    pub fn with_inactive() -> Self {
        Self { active_test: false }
    }

    pub fn admits(&self, active: bool) -> bool {
        !self.active_test || active
    }
}

impl ValueObject for SearchContext {}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Predicate over an optional string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrMatch {
    Eq(String),
    /// Case-insensitive pattern: `%` matches any run, `_` any single char.
    ILike(String),
    In(Vec<String>),
    IsNull,
    NotNull,
}

impl StrMatch {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (StrMatch::IsNull, v) => v.is_none(),
            (StrMatch::NotNull, v) => v.is_some(),
            (_, None) => false,
            (StrMatch::Eq(expected), Some(v)) => v == expected,
            (StrMatch::In(values), Some(v)) => values.iter().any(|e| e == v),
            (StrMatch::ILike(pattern), Some(v)) => {
                let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
                let value: Vec<char> = v.to_lowercase().chars().collect();
                ilike(&pattern, &value)
            }
        }
    }
}

/// Wildcard match that only ever backtracks to the last `%` seen.
fn ilike(pattern: &[char], value: &[char]) -> bool {
    let (mut p, mut v) = (0, 0);
    // (pattern index after the last `%`, value index it was resumed at)
    let mut resume: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p) {
            Some('%') => {
                p += 1;
                resume = Some((p, v));
            }
            Some(c) if *c == '_' || *c == value[v] => {
                p += 1;
                v += 1;
            }
            _ => match resume {
                Some((after, from)) => {
                    p = after;
                    v = from + 1;
                    resume = Some((after, v));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

/// Predicate over variants.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantFilter<X: TemplateExtension> {
    All,
    Id(VariantId),
    IdNotIn(Vec<VariantId>),
    TemplateIn(Vec<TemplateId>),
    Active(bool),
    Code(StrMatch),
    AttributesString(StrMatch),
    /// Predicate on the owning template.
    Template(Box<TemplateFilter<X>>),
    And(Vec<VariantFilter<X>>),
    Or(Vec<VariantFilter<X>>),
}

impl<X: TemplateExtension> VariantFilter<X> {
    pub fn template(filter: TemplateFilter<X>) -> Self {
        Self::Template(Box::new(filter))
    }

    pub fn matches(
        &self,
        variant: &Variant,
        lookup: &dyn CatalogLookup<X>,
        ctx: &SearchContext,
    ) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => variant.id == *id,
            Self::IdNotIn(ids) => !ids.contains(&variant.id),
            Self::TemplateIn(ids) => ids.contains(&variant.template),
            Self::Active(active) => variant.active == *active,
            Self::Code(m) => m.matches(variant.code.as_deref()),
            Self::AttributesString(m) => m.matches(variant.attributes_string().as_deref()),
            Self::Template(filter) => lookup
                .template(variant.template)
                .is_some_and(|t| filter.matches(&t, lookup, ctx)),
            Self::And(filters) => filters.iter().all(|f| f.matches(variant, lookup, ctx)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(variant, lookup, ctx)),
        }
    }
}

/// Predicate over templates.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateFilter<X: TemplateExtension> {
    All,
    Id(TemplateId),
    IdIn(Vec<TemplateId>),
    Name(StrMatch),
    Active(bool),
    /// Predicate on the fields a module added to templates.
    Extension(X::Predicate),
    /// At least one variant (visible under the search context) matches.
    AnyVariant(Box<VariantFilter<X>>),
    And(Vec<TemplateFilter<X>>),
    Or(Vec<TemplateFilter<X>>),
}

impl<X: TemplateExtension> TemplateFilter<X> {
    pub fn any_variant(filter: VariantFilter<X>) -> Self {
        Self::AnyVariant(Box::new(filter))
    }

    pub fn matches(
        &self,
        template: &Template<X>,
        lookup: &dyn CatalogLookup<X>,
        ctx: &SearchContext,
    ) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => template.id == *id,
            Self::IdIn(ids) => ids.contains(&template.id),
            Self::Name(m) => m.matches(Some(&template.name)),
            Self::Active(active) => template.active == *active,
            Self::Extension(predicate) => template.ext.matches(predicate),
            Self::AnyVariant(filter) => lookup
                .template_variants(template.id, ctx)
                .iter()
                .any(|v| filter.matches(v, lookup, ctx)),
            Self::And(filters) => filters.iter().all(|f| f.matches(template, lookup, ctx)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(template, lookup, ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::NewVariant;

    struct OneTemplate {
        template: Template<()>,
        variants: Vec<Variant>,
    }

    impl CatalogLookup<()> for OneTemplate {
        fn template(&self, id: TemplateId) -> Option<Template<()>> {
            (self.template.id == id).then(|| self.template.clone())
        }

        fn variant(&self, id: VariantId) -> Option<Variant> {
            self.variants.iter().find(|v| v.id == id).cloned()
        }

        fn template_variants(&self, template: TemplateId, ctx: &SearchContext) -> Vec<Variant> {
            self.variants
                .iter()
                .filter(|v| v.template == template && ctx.admits(v.active))
                .cloned()
                .collect()
        }

        fn search_templates(
            &self,
            _filter: &TemplateFilter<()>,
            _ctx: &SearchContext,
            _limit: Option<usize>,
        ) -> Vec<Template<()>> {
            Vec::new()
        }

        fn search_variants(
            &self,
            _filter: &VariantFilter<()>,
            _ctx: &SearchContext,
            _limit: Option<usize>,
        ) -> Vec<Variant> {
            Vec::new()
        }
    }

    fn fixture() -> OneTemplate {
        let template = Template {
            id: TemplateId::new(),
            name: "Desk".to_string(),
            prefix_code: None,
            active: true,
            ext: (),
        };
        let hidden = Variant::new(
            VariantId::new(),
            template.id,
            &NewVariant::with_suffix("7").with_attribute("color", "oak").inactive(),
            None,
        );
        OneTemplate { template, variants: vec![hidden] }
    }

    #[test]
    fn ilike_supports_wildcards_and_ignores_case() {
        let m = StrMatch::ILike("%OAK%".to_string());
        assert!(m.matches(Some("color:oak")));
        assert!(!m.matches(Some("color:pine")));
        assert!(!m.matches(None));
        assert!(StrMatch::ILike("c_de".to_string()).matches(Some("Code")));
    }

    #[test]
    fn null_matchers() {
        assert!(StrMatch::IsNull.matches(None));
        assert!(!StrMatch::IsNull.matches(Some("")));
        assert!(StrMatch::NotNull.matches(Some("x")));
    }

    #[test]
    fn any_variant_respects_active_test() {
        let lookup = fixture();
        let filter = TemplateFilter::any_variant(VariantFilter::AttributesString(StrMatch::ILike(
            "%oak%".to_string(),
        )));

        assert!(!filter.matches(&lookup.template, &lookup, &SearchContext::default()));
        assert!(filter.matches(&lookup.template, &lookup, &SearchContext::with_inactive()));
    }

    #[test]
    fn variant_filter_reaches_the_owning_template() {
        let lookup = fixture();
        let variant = lookup.variants[0].clone();
        let ctx = SearchContext::with_inactive();

        let by_name = VariantFilter::template(TemplateFilter::Name(StrMatch::Eq("Desk".to_string())));
        assert!(by_name.matches(&variant, &lookup, &ctx));

        let excluded = VariantFilter::And(vec![
            VariantFilter::IdNotIn(vec![variant.id]),
            VariantFilter::TemplateIn(vec![variant.template]),
        ]);
        assert!(!excluded.matches(&variant, &lookup, &ctx));
    }

    #[test]
    fn ilike_matches_literals_and_wildcards_in_order() {
        assert!(StrMatch::ILike("%b".to_string()).matches(Some("aab")));
        assert!(StrMatch::ILike("a%b%c".to_string()).matches(Some("aXbYbZc")));
        assert!(!StrMatch::ILike("a%b%c".to_string()).matches(Some("aXcYb")));
        assert!(StrMatch::ILike("%".to_string()).matches(Some("")));
        assert!(!StrMatch::ILike("_".to_string()).matches(Some("")));
        assert!(StrMatch::ILike("%_%".to_string()).matches(Some("x")));
        assert!(!StrMatch::ILike("ab".to_string()).matches(Some("abc")));
    }

    #[test]
    fn ilike_stays_linear_on_repeated_wildcards() {
        let value = "a".repeat(40);
        let started = std::time::Instant::now();

        assert!(!StrMatch::ILike(format!("{}b", "%".repeat(10))).matches(Some(&value)));
        assert!(!StrMatch::ILike("%a%a%a%a%b".to_string()).matches(Some(&value)));
        assert!(StrMatch::ILike("%a%a%a%a%".to_string()).matches(Some(&value)));

        assert!(started.elapsed() < std::time::Duration::from_millis(500));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a pattern without wildcards behaves as case-insensitive equality.
            #[test]
            fn literal_ilike_is_case_insensitive_eq(value in "[A-Za-z0-9:, ]{0,24}") {
                let m = StrMatch::ILike(value.to_uppercase());
                prop_assert!(m.matches(Some(&value)));
                prop_assert!(m.matches(Some(&value.to_lowercase())));
            }

            /// Property: a `%`-only pattern matches any value.
            #[test]
            fn percent_only_matches_everything(
                value in "[a-z0-9:, ]{0,40}",
                wildcards in 1usize..16,
            ) {
                prop_assert!(StrMatch::ILike("%".repeat(wildcards)).matches(Some(&value)));
            }

            /// Property: `%` around any substring matches the whole value.
            #[test]
            fn percent_wraps_any_substring(
                value in "[a-z0-9:, ]{0,24}",
                start in 0usize..24,
                len in 0usize..24,
            ) {
                let start = start.min(value.len());
                let end = (start + len).min(value.len());
                let pattern = format!("%{}%", &value[start..end]);
                prop_assert!(StrMatch::ILike(pattern).matches(Some(&value)));
            }
        }
    }
}
