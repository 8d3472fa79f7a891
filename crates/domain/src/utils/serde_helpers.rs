//! Serde adapters for backend wire quirks

use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize `null` as the type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `Vec<String>` carried on the wire as one comma-joined string.
pub mod comma_list {
    use super::{Deserialize, Deserializer, Serializer};

    /// Join tags with commas.
    pub fn serialize<S>(items: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&items.join(","))
    }

    /// Split a comma list, dropping blanks.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(crate::utils::split_keywords(&raw).into_iter().map(str::to_string).collect())
    }
}
