//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: a shelf life of "7 days" is equal to any
/// other "7 days", and a food type label is equal to any other label with the
/// same text. Compare with [`crate::Entity`], where two records with the same
/// id are the same record.
///
/// Value objects are immutable. To "modify" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Label(String);
///
/// impl ValueObject for Label {}
///
/// assert_eq!(Label("Dairy".into()), Label("Dairy".into()));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
