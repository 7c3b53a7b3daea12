//! Form states driven by the `unique_variant` flag.

use forgeerp_core::ValueObject;

use crate::template::{UniqueTemplate, variants_size_limit};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStates {
    pub readonly: bool,
    pub invisible: bool,
}

impl ValueObject for FieldStates {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateViewStates {
    pub code: FieldStates,
    pub attributes_string: FieldStates,
    /// Maximum rows the variant list accepts.
    pub variants_size: usize,
}

impl ValueObject for TemplateViewStates {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantViewStates {
    pub suffix_code: FieldStates,
}

impl ValueObject for VariantViewStates {}

/// Read-through fields are only shown on flagged templates.
pub fn template_view_states(template: &UniqueTemplate) -> TemplateViewStates {
    let hidden = FieldStates {
        readonly: true,
        invisible: !template.ext.unique_variant,
    };
    TemplateViewStates {
        code: hidden,
        attributes_string: hidden,
        variants_size: variants_size_limit(template),
    }
}

/// `suffix_code` is locked on variants of flagged templates, on top of
/// whatever the host already locks it for.
///
/// `unique_variant` is the live form value, see
/// [`crate::variant::on_change_with_unique_variant`].
pub fn variant_view_states(unique_variant: Option<bool>, base: FieldStates) -> VariantViewStates {
    VariantViewStates {
        suffix_code: FieldStates {
            readonly: base.readonly || unique_variant.unwrap_or(false),
            ..base
        },
    }
}
