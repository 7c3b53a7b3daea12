use serde::{Deserialize, Serialize};

use forgeerp_core::{Entity, RecordId};

use crate::variant::NewVariant;

/// Template identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub RecordId);

impl TemplateId {
    pub fn new() -> Self {
        Self(RecordId::new())
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Fields a module adds to templates.
///
/// The host catalog stores the extension next to its own fields and never
/// looks inside it, except through this trait.
pub trait TemplateExtension:
    Clone + Default + PartialEq + core::fmt::Debug + Send + Sync + 'static
{
    /// Partial update carried by template writes.
    type Changes: Clone + Default + PartialEq + core::fmt::Debug + Send + Sync;

    /// Search predicate over the extension fields.
    type Predicate: Clone + PartialEq + core::fmt::Debug + Send + Sync;

    fn apply(&mut self, changes: &Self::Changes);

    fn matches(&self, predicate: &Self::Predicate) -> bool;
}

/// The bare host catalog: no extra fields.
impl TemplateExtension for () {
    type Changes = ();
    type Predicate = ();

    fn apply(&mut self, _changes: &Self::Changes) {}

    fn matches(&self, _predicate: &Self::Predicate) -> bool {
        true
    }
}

/// Abstract product definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template<X> {
    pub id: TemplateId,
    pub name: String,
    /// Prepended to every variant's suffix to form the variant code.
    pub prefix_code: Option<String>,
    pub active: bool,
    pub ext: X,
}

impl<X> Template<X> {
    /// Display name used in user-facing messages.
    pub fn rec_name(&self) -> &str {
        &self.name
    }
}

impl<X> Entity for Template<X> {
    type Id = TemplateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Values for a template creation, with nested variants.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate<X> {
    pub name: String,
    pub prefix_code: Option<String>,
    pub active: bool,
    /// `None` lets the installed hooks pick the default.
    pub ext: Option<X>,
    pub variants: Vec<NewVariant>,
}

impl<X> NewTemplate<X> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix_code: None,
            active: true,
            ext: None,
            variants: Vec::new(),
        }
    }

    pub fn with_prefix_code(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_code = Some(prefix.into());
        self
    }

    pub fn with_ext(mut self, ext: X) -> Self {
        self.ext = Some(ext);
        self
    }

    pub fn with_variant(mut self, variant: NewVariant) -> Self {
        self.variants.push(variant);
        self
    }
}

/// Partial update of a template. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateChanges<X: TemplateExtension> {
    pub name: Option<String>,
    pub prefix_code: Option<Option<String>>,
    pub active: Option<bool>,
    pub ext: X::Changes,
    /// Variants created through the template's variant collection.
    pub add_variants: Vec<NewVariant>,
}

impl<X: TemplateExtension> TemplateChanges<X> {
    pub fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    pub fn ext(ext: X::Changes) -> Self {
        Self {
            ext,
            ..Self::default()
        }
    }

    pub fn add_variant(variant: NewVariant) -> Self {
        Self {
            add_variants: vec![variant],
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(&self, template: &mut Template<X>) {
        if let Some(name) = &self.name {
            template.name = name.clone();
        }
        if let Some(prefix) = &self.prefix_code {
            template.prefix_code = prefix.clone();
        }
        if let Some(active) = self.active {
            template.active = active;
        }
        template.ext.apply(&self.ext);
    }
}

/// One `(records, values)` pair of a template write.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateWrite<X: TemplateExtension> {
    pub ids: Vec<TemplateId>,
    pub changes: TemplateChanges<X>,
}

impl<X: TemplateExtension> TemplateWrite<X> {
    pub fn new(ids: Vec<TemplateId>, changes: TemplateChanges<X>) -> Self {
        Self { ids, changes }
    }
}
