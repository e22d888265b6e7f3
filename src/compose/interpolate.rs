//! Property interpolation for dependency versions
//!
//! A version string is expanded only when it is exactly `${name}`: whole
//! string, no partial substitution, no nesting. Expansion never fails: an
//! unresolved reference passes through byte-identical, wrapper included.

use std::collections::BTreeMap;

/// Expands a version string against a merged property map
pub fn expand(version: &str, properties: &BTreeMap<String, String>) -> String {
    let name = version
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'));

    match name.and_then(|n| properties.get(n)) {
        Some(value) => value.clone(),
        None => version.to_string(),
    }
}
