//! Domain error model.

use thiserror::Error;

/// A field failed validation.
///
/// `field` is a path into the checked document (`bill.products[2].price`),
/// `reason` is a short human-readable explanation (`must be >= 0`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field}, {reason}")]
pub struct ValidationError {
    field: String,
    reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Path of the offending field.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Prefix the field path with the enclosing field, e.g. `price` inside
    /// `bill.products[0]` becomes `bill.products[0].price`.
    pub fn within(mut self, parent: impl AsRef<str>) -> Self {
        let parent = parent.as_ref();
        if !parent.is_empty() {
            self.field = format!("{parent}.{}", self.field);
        }
        self
    }
}

/// Domain-level error.
///
/// Field checks report [`ValidationError`] directly. Transport and decoding
/// problems live in the client crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
