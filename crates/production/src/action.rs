use serde::{Deserialize, Serialize};

use forgeerp_core::RecordId;
use forgeerp_products::{TemplateId, VariantId};

pub const TEMPLATE_MODEL: &str = "product.template";
pub const VARIANT_MODEL: &str = "product.product";

/// Record an action was invoked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Template(TemplateId),
    Variant(VariantId),
    Other { model: String, id: RecordId },
}

impl Subject {
    pub fn model(&self) -> &str {
        match self {
            Subject::Template(_) => TEMPLATE_MODEL,
            Subject::Variant(_) => VARIANT_MODEL,
            Subject::Other { model, .. } => model,
        }
    }

    pub fn record_id(&self) -> RecordId {
        match self {
            Subject::Template(id) => id.0,
            Subject::Variant(id) => id.0,
            Subject::Other { id, .. } => *id,
        }
    }
}

/// Invocation context handed to a wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    /// Record the action was launched from, if any.
    pub active: Option<Subject>,
    /// Full selection at launch time.
    pub active_ids: Vec<Subject>,
}

impl ActionContext {
    pub fn on(subject: Subject) -> Self {
        Self {
            active: Some(subject.clone()),
            active_ids: vec![subject],
        }
    }

    /// Retarget the context on a single variant.
    pub fn retarget(&mut self, variant: VariantId) {
        self.active = Some(Subject::Variant(variant));
        self.active_ids = vec![Subject::Variant(variant)];
    }
}

/// Client action a wizard step returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub res_model: String,
    pub active_id: Option<RecordId>,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, res_model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            res_model: res_model.into(),
            active_id: None,
        }
    }
}
