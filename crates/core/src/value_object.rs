//! Value object trait: equality by value, not identity.
//!
//! Configuration snapshots, view states and search contexts carry no identity of
//! their own; two of them with the same values are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct FieldStates {
///     readonly: bool,
///     invisible: bool,
/// }
///
/// impl ValueObject for FieldStates {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
