//! Domain utilities

pub mod serde_helpers;

/// Split a backend keyword list ("music, trains,  ") into trimmed, non-empty
/// entries.
pub fn split_keywords(value: &str) -> Vec<&str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty()).collect()
}
