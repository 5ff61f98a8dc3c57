//! Catalog payload fields.
//!
//! Objects are edited in place: a field changes only when it is present and
//! truthy, and no key is ever added, removed or reordered.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Keep `"field": null` distinguishable from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Truthiness as the catalog's own frontend sees it.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy; everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// True when the optional field exists and is truthy.
pub fn is_set(field: &Option<Value>) -> bool {
    field.as_ref().is_some_and(is_truthy)
}

/// Overwrite `key` in place when it is present and truthy.
///
/// Returns whether the field was replaced. Key position is preserved.
pub fn replace_if_set(object: &mut Map<String, Value>, key: &str, value: Value) -> bool {
    match object.get_mut(key) {
        Some(current) if is_truthy(current) => {
            *current = value;
            true
        }
        _ => false,
    }
}

/// Location fields rewritten on `/api/v1/accounts/users/location`.
pub mod location {
    pub const IP: &str = "ip";
    pub const COUNTRY: &str = "country";
    pub const ISO_CODE: &str = "iso_code";
    pub const TIMEZONE: &str = "timezone";
    pub const RESTRICTIONS: &str = "restrictions";
    pub const HIDE_TORRENTS: &str = "hide_torrents";
}

/// Block flags carried by every release-like object.
pub const BLOCK_FLAGS: [&str; 2] = ["is_blocked_by_geo", "is_blocked_by_copyrights"];

/// The two fields that reveal an origin response with missing episodes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodeListing {
    #[serde(default, deserialize_with = "present")]
    pub episodes_total: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub episodes: Option<Value>,
}
