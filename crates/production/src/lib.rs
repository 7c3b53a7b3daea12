//! Production wizards.
//!
//! Only the entry points of the bill-of-materials tree wizards live here: the
//! invocation context they receive and the handlers that start them. Other
//! modules decorate the handlers to change which record a wizard opens on.

pub mod action;
pub mod bom_tree;

pub use action::{ActionContext, ActionDescriptor, Subject, TEMPLATE_MODEL, VARIANT_MODEL};
pub use bom_tree::{
    BomTreeStart, DefaultOpenBomTree, DefaultOpenReverseBomTree, OpenBomTree, OpenReverseBomTree,
    ReverseBomTreeLaunch,
};
