//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Historical projects are entities: two records with the same project id
/// describe the same project, even if a feed reports them with different
/// similarity annotations.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
