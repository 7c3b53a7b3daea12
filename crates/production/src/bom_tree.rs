use serde::{Deserialize, Serialize};

use forgeerp_core::{DomainError, DomainResult};
use forgeerp_products::VariantId;

use crate::action::{ActionContext, ActionDescriptor, Subject, VARIANT_MODEL};

/// Initial values of the "open BOM tree" wizard form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomTreeStart {
    pub product: Option<VariantId>,
    pub quantity: f64,
}

/// Result of starting the "open reverse BOM tree" wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseBomTreeLaunch {
    pub action: ActionDescriptor,
    pub product: VariantId,
}

/// Computes the start form of the BOM tree wizard.
pub trait OpenBomTree {
    fn default_start(&self, ctx: &ActionContext) -> DomainResult<BomTreeStart>;
}

/// Opens the reverse BOM tree (where-used) of a product.
pub trait OpenReverseBomTree {
    fn do_start(
        &self,
        ctx: &ActionContext,
        action: ActionDescriptor,
    ) -> DomainResult<ReverseBomTreeLaunch>;
}

fn wrong_subject(subject: &Subject) -> DomainError {
    DomainError::validation(format!(
        "BOM trees open on \"{VARIANT_MODEL}\" records, got \"{}\"",
        subject.model()
    ))
}

/// Host handler: works on variants only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultOpenBomTree;

impl OpenBomTree for DefaultOpenBomTree {
    fn default_start(&self, ctx: &ActionContext) -> DomainResult<BomTreeStart> {
        let product = match &ctx.active {
            None => None,
            Some(Subject::Variant(id)) => Some(*id),
            Some(other) => return Err(wrong_subject(other)),
        };
        Ok(BomTreeStart {
            product,
            quantity: 1.0,
        })
    }
}

/// Host handler: works on variants only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultOpenReverseBomTree;

impl OpenReverseBomTree for DefaultOpenReverseBomTree {
    fn do_start(
        &self,
        ctx: &ActionContext,
        mut action: ActionDescriptor,
    ) -> DomainResult<ReverseBomTreeLaunch> {
        match &ctx.active {
            Some(subject @ Subject::Variant(id)) => {
                action.res_model = subject.model().to_string();
                action.active_id = Some(subject.record_id());
                Ok(ReverseBomTreeLaunch {
                    action,
                    product: *id,
                })
            }
            Some(other) => Err(wrong_subject(other)),
            None => Err(DomainError::validation("no product selected")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgeerp_products::TemplateId;

    #[test]
    fn bom_tree_starts_on_the_active_variant() {
        let variant = VariantId::new();
        let start = DefaultOpenBomTree
            .default_start(&ActionContext::on(Subject::Variant(variant)))
            .unwrap();
        assert_eq!(start.product, Some(variant));
        assert_eq!(start.quantity, 1.0);
    }

    #[test]
    fn bom_tree_without_subject_starts_empty() {
        let start = DefaultOpenBomTree.default_start(&ActionContext::default()).unwrap();
        assert_eq!(start.product, None);
    }

    #[test]
    fn templates_are_rejected_by_the_host_handlers() {
        let ctx = ActionContext::on(Subject::Template(TemplateId::new()));
        assert!(matches!(
            DefaultOpenBomTree.default_start(&ctx),
            Err(DomainError::Validation(_))
        ));
        let action = ActionDescriptor::new("Reverse BOM", "product.template");
        assert!(matches!(
            DefaultOpenReverseBomTree.do_start(&ctx, action),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn reverse_tree_points_the_action_at_the_variant() {
        let variant = VariantId::new();
        let launch = DefaultOpenReverseBomTree
            .do_start(
                &ActionContext::on(Subject::Variant(variant)),
                ActionDescriptor::new("Reverse BOM", VARIANT_MODEL),
            )
            .unwrap();
        assert_eq!(launch.product, variant);
        assert_eq!(launch.action.res_model, VARIANT_MODEL);
        assert_eq!(launch.action.active_id, Some(variant.0));
    }
}
