use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use forgeerp_core::{Entity, RecordId};

use crate::template::TemplateId;

/// Variant (concrete product) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub RecordId);

impl VariantId {
    pub fn new() -> Self {
        Self(RecordId::new())
    }
}

impl Default for VariantId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for VariantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Concrete sellable product, owned by exactly one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub template: TemplateId,
    pub suffix_code: Option<String>,
    /// Template prefix followed by `suffix_code`.
    pub code: Option<String>,
    pub active: bool,
    pub attributes: BTreeMap<String, String>,
}

impl Variant {
    pub fn new(id: VariantId, template: TemplateId, values: &NewVariant, prefix: Option<&str>) -> Self {
        Self {
            id,
            template,
            suffix_code: values.suffix_code.clone(),
            code: compose_code(prefix, values.suffix_code.as_deref()),
            active: values.active,
            attributes: values.attributes.clone(),
        }
    }

    /// `key:value` pairs in key order, `None` when the variant has no attributes.
    pub fn attributes_string(&self) -> Option<String> {
        if self.attributes.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .attributes
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect();
        Some(parts.join(", "))
    }

    /// Recompute `code` after the template prefix or the suffix changed.
    pub fn refresh_code(&mut self, prefix: Option<&str>) {
        self.code = compose_code(prefix, self.suffix_code.as_deref());
    }
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn compose_code(prefix: Option<&str>, suffix: Option<&str>) -> Option<String> {
    let code = format!("{}{}", prefix.unwrap_or_default(), suffix.unwrap_or_default());
    if code.is_empty() { None } else { Some(code) }
}

/// Values for a variant creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariant {
    pub suffix_code: Option<String>,
    pub active: bool,
    pub attributes: BTreeMap<String, String>,
}

impl Default for NewVariant {
    fn default() -> Self {
        Self {
            suffix_code: None,
            active: true,
            attributes: BTreeMap::new(),
        }
    }
}

impl NewVariant {
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix_code: Some(suffix.into()),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Partial update of a variant. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantChanges {
    pub template: Option<TemplateId>,
    pub suffix_code: Option<Option<String>>,
    pub active: Option<bool>,
    pub attributes: Option<BTreeMap<String, String>>,
}

impl VariantChanges {
    pub fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    /// Apply the changes; the caller refreshes `code` from the (new) template.
    pub fn apply_to(&self, variant: &mut Variant) {
        if let Some(template) = self.template {
            variant.template = template;
        }
        if let Some(suffix) = &self.suffix_code {
            variant.suffix_code = suffix.clone();
        }
        if let Some(active) = self.active {
            variant.active = active;
        }
        if let Some(attributes) = &self.attributes {
            variant.attributes = attributes.clone();
        }
    }
}

/// One `(records, values)` pair of a variant write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantWrite {
    pub ids: Vec<VariantId>,
    pub changes: VariantChanges,
}

impl VariantWrite {
    pub fn new(ids: Vec<VariantId>, changes: VariantChanges) -> Self {
        Self { ids, changes }
    }
}
