//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Phase templates, phase statistics and every derived estimate are value
/// objects: they are built per request, compared by their fields, and never
/// updated in place. To "modify" one, construct a new one.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (two entities with same ID are the same entity)
///
/// Example:
/// - `PhaseStatistic { phase_name: "Bogie Assembly", avg_duration_hours: 305.0, .. }` is a value object
/// - `HistoricalProject { project_id: ProjectId(..), .. }` is an entity
///
/// The trait requires `Clone + PartialEq + Debug`, so values can be copied
/// between pipeline stages, compared in tests, and logged.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
