//! Domain model module declarations.

use serde::{Deserialize, Deserializer};

pub mod outcome;
pub mod task;

/// Deserialize an optional text column, mapping `""` to `None`.
///
/// The store returns unset labels as either `null` or `""` depending on how
/// the row was written; both mean "not set" for message formatting.
/// Whitespace-only labels are kept as written.
pub(crate) fn deserialize_empty_as_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}
