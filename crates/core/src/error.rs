//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A localized, user-facing error.
///
/// `message_id` is the stable key the message was resolved from; `message` is
/// the rendered text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    pub message_id: String,
    pub message: String,
}

impl UserError {
    pub fn new(message_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for UserError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A localized rule violation meant to be shown to the user as-is.
    #[error("{0}")]
    User(UserError),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. duplicate record id).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn user(message_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::User(UserError::new(message_id, message))
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Message id of a user-facing error, if this is one.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::User(e) => Some(&e.message_id),
            _ => None,
        }
    }
}

impl From<UserError> for DomainError {
    fn from(value: UserError) -> Self {
        Self::User(value)
    }
}
