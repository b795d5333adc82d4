//! Entity trait: identity + continuity across state changes.

/// Something with a stable identifier, compared by that identifier.
///
/// Bill line items are entities: two lines with the same name and price are
/// still distinct if their ids differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
