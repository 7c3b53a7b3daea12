use thiserror::Error;

use forgeerp_core::DomainError;

use crate::messages::{MessageCatalog, NOT_PRODUCT_VARIANT, TEMPLATE_UNIQ};

/// Rule violations raised by this module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantUniqueError {
    /// Two variants would share a unique-variant template.
    #[error("template of the product variant must be unique")]
    TemplateUniq,

    /// A unique-variant template has no variant to act on.
    #[error("template \"{template}\" has no product variant")]
    NotProductVariant { template: String },
}

impl VariantUniqueError {
    pub fn message_id(&self) -> &'static str {
        match self {
            Self::TemplateUniq => TEMPLATE_UNIQ,
            Self::NotProductVariant { .. } => NOT_PRODUCT_VARIANT,
        }
    }

    /// Render through `messages` into the user-facing domain error.
    pub fn localize(&self, messages: &dyn MessageCatalog) -> DomainError {
        let message = match self {
            Self::TemplateUniq => messages.render(TEMPLATE_UNIQ, &[]),
            Self::NotProductVariant { template } => {
                messages.render(NOT_PRODUCT_VARIANT, &[("template", template.as_str())])
            }
        };
        DomainError::user(self.message_id(), message)
    }
}
