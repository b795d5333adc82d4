//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A value object has no identity; it is defined entirely by its attributes
/// and replaced wholesale instead of edited. `PdfConfig` is one: changing the
/// paper size produces a new config.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Margin { points: f64 }
///
/// impl ValueObject for Margin {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
