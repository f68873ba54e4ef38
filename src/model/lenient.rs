//! Forgiving field parsers for stored documents.
//!
//! Documents are written by older versions of the app and sometimes edited by hand, so a single
//! field with an unexpected shape (a `null` amount, a number where text belongs) must not make
//! the whole document unreadable. Each parser here takes a default for such a field and logs a
//! warning instead of failing.

use crate::model::Amount;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// A text field. Numbers and booleans keep their JSON text; `null` becomes empty.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string(deserializer)?.unwrap_or_default())
}

/// An optional text field. Numbers and booleans keep their JSON text; `null` is `None`.
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            warn!("Ignoring {other} where text was expected");
            None
        }
    })
}

/// An amount given as a string or a number. Anything unreadable, including `null` (which is what
/// a `NaN` amount becomes in JSON), is zero.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::String(s) => Amount::from_str(s).ok(),
        Value::Number(n) => Amount::from_str(&n.to_string()).ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        warn!("Unreadable amount {value}, using 0");
        Amount::ZERO
    }))
}

/// A nested object. `null` or a value of the wrong shape takes the default.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("Using defaults for an unreadable value: {e}");
        T::default()
    }))
}

/// A list of records. `null` is an empty list and entries that cannot be read are skipped.
pub(crate) fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = match Value::deserialize(deserializer)? {
        Value::Array(values) => values,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("Ignoring {other} where a list was expected");
            return Ok(Vec::new());
        }
    };
    Ok(values
        .into_iter()
        .filter_map(|v| match serde_json::from_value(v) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping an unreadable entry: {e}");
                None
            }
        })
        .collect())
}
