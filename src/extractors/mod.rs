//! Independent extraction strategies.
//!
//! Each strategy is a pure function of a [`PageSnapshot`](crate::page::PageSnapshot)
//! returning `Some(EventContext)` or `None` ("try the next one"). The
//! orchestrator decides which ones run and in what order.

pub mod embedded_json;
pub mod free_text;
pub mod jsonld;
pub mod meta;
pub mod slug;
pub mod title;

use crate::text::{contains_ignore_case, normalize_space};
use serde_json::Value;

/// JavaScript-style truthiness for loosely shaped JSON.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Follow a dotted key path (`"venue.address.addressLocality"`).
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |node, key| node.get(key))
}

/// First truthy value among several aliased key paths.
pub(crate) fn first_truthy<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .find(|v| truthy(v))
}

/// Scalar JSON rendered as text; containers have no text form.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Non-empty string value of `value`, if it is a string at all.
pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Append the venue to a performer query unless it already mentions it.
pub(crate) fn append_venue(performer: String, venue: Option<&str>) -> String {
    match venue.map(normalize_space).filter(|v| !v.is_empty()) {
        Some(v) if !contains_ignore_case(&performer, &v) => {
            normalize_space(&format!("{} {}", performer, v))
        }
        _ => performer,
    }
}
