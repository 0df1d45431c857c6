//! Dotted-path lookup into a [`Value`] tree.
//!
//! Segments are separated by `.`. At a map node a segment is a key; at a list
//! node it must parse as an integer index, negative indices counting from the
//! end. Anything else resolves to `None`.
//!
//! ```
//! use apprgate_core::value::Value;
//! use apprgate_policy::path::resolve;
//!
//! let tree = Value::from(serde_json::json!({"data": [{"to": "0xabc"}, {"to": "0xdef"}]}));
//!
//! assert_eq!(resolve(&tree, "data.0.to").and_then(Value::as_str), Some("0xabc"));
//! assert_eq!(resolve(&tree, "data.-1.to").and_then(Value::as_str), Some("0xdef"));
//! assert!(resolve(&tree, "data.2.to").is_none());
//! ```

use apprgate_core::value::Value;

/// Resolves `path` against `tree`.
///
/// Returns `None` when a key is missing, an index is not an integer or is out
/// of range, or a leaf is reached with segments left over.
#[must_use]
pub fn resolve<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(tree, step)
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Map(map) => map.get(segment),
        Value::List(items) => {
            let index: i64 = segment.parse().ok()?;
            let len = i64::try_from(items.len()).ok()?;
            let index = if index < 0 { len + index } else { index };
            items.get(usize::try_from(index).ok()?)
        }
        Value::String(_) => None,
    }
}
