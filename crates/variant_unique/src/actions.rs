//! BOM tree wizards opened from a unique-variant template.
//!
//! A flagged template stands for its single variant, so the wizards are
//! retargeted on that variant instead of asking the user to pick one.

use forgeerp_core::{DomainError, DomainResult};
use forgeerp_production::{
    ActionContext, ActionDescriptor, BomTreeStart, OpenBomTree, OpenReverseBomTree,
    ReverseBomTreeLaunch, Subject, VARIANT_MODEL,
};
use forgeerp_products::{CatalogLookup, VariantId};

use crate::error::VariantUniqueError;
use crate::messages::{MessageCatalog, Translations};
use crate::template::{UniqueVariant, sole_variant};

/// Variant to open the wizard on, when the context points at a flagged template.
///
/// `Ok(None)` means the context is left as is.
fn redirect_target(
    lookup: &dyn CatalogLookup<UniqueVariant>,
    messages: &dyn MessageCatalog,
    ctx: &ActionContext,
) -> DomainResult<Option<VariantId>> {
    let Some(Subject::Template(id)) = &ctx.active else {
        return Ok(None);
    };
    let template = lookup.template(*id).ok_or_else(DomainError::not_found)?;
    if !template.ext.unique_variant {
        return Ok(None);
    }

    match sole_variant(lookup, &template) {
        Some(variant) => {
            tracing::debug!(template = %template.id, variant = %variant.id, "opening BOM tree on the template's variant");
            Ok(Some(variant.id))
        }
        None => Err(VariantUniqueError::NotProductVariant {
            template: template.rec_name().to_string(),
        }
        .localize(messages)),
    }
}

/// Decorates an [`OpenBomTree`] handler.
#[derive(Debug, Clone)]
pub struct UniqueVariantOpenBomTree<L, H, M = Translations> {
    lookup: L,
    inner: H,
    messages: M,
}

impl<L, H, M> UniqueVariantOpenBomTree<L, H, M> {
    pub fn new(lookup: L, inner: H, messages: M) -> Self {
        Self {
            lookup,
            inner,
            messages,
        }
    }
}

impl<L, H, M> OpenBomTree for UniqueVariantOpenBomTree<L, H, M>
where
    L: CatalogLookup<UniqueVariant>,
    H: OpenBomTree,
    M: MessageCatalog,
{
    fn default_start(&self, ctx: &ActionContext) -> DomainResult<BomTreeStart> {
        match redirect_target(&self.lookup, &self.messages, ctx)? {
            Some(variant) => {
                let mut ctx = ctx.clone();
                ctx.retarget(variant);
                self.inner.default_start(&ctx)
            }
            None => self.inner.default_start(ctx),
        }
    }
}

/// Decorates an [`OpenReverseBomTree`] handler.
#[derive(Debug, Clone)]
pub struct UniqueVariantOpenReverseBomTree<L, H, M = Translations> {
    lookup: L,
    inner: H,
    messages: M,
}

impl<L, H, M> UniqueVariantOpenReverseBomTree<L, H, M> {
    pub fn new(lookup: L, inner: H, messages: M) -> Self {
        Self {
            lookup,
            inner,
            messages,
        }
    }
}

impl<L, H, M> OpenReverseBomTree for UniqueVariantOpenReverseBomTree<L, H, M>
where
    L: CatalogLookup<UniqueVariant>,
    H: OpenReverseBomTree,
    M: MessageCatalog,
{
    fn do_start(
        &self,
        ctx: &ActionContext,
        mut action: ActionDescriptor,
    ) -> DomainResult<ReverseBomTreeLaunch> {
        match redirect_target(&self.lookup, &self.messages, ctx)? {
            Some(variant) => {
                let mut ctx = ctx.clone();
                ctx.retarget(variant);
                action.res_model = VARIANT_MODEL.to_string();
                action.active_id = Some(variant.0);
                self.inner.do_start(&ctx, action)
            }
            None => self.inner.do_start(ctx, action),
        }
    }
}
