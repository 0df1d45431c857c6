//! Schema-less value tree for transaction and message descriptors.
//!
//! Descriptors arrive from many chains and from the custody service with no fixed
//! shape. Rules address them through dotted paths, so the tree only needs three
//! node kinds: string leaves, ordered lists and string-keyed maps.
//!
//! Numbers are kept as their textual form, which keeps them decimal-parseable for
//! numeric rules. Booleans become `"true"`/`"false"` and `null` becomes `""`.
//!
//! # Examples
//!
//! ```
//! use apprgate_core::value::Value;
//!
//! let tree = Value::from(serde_json::json!({
//!     "amount": 1.5,
//!     "tags": ["a", "b"],
//! }));
//!
//! assert_eq!(tree.get("amount").and_then(Value::as_str), Some("1.5"));
//! assert_eq!(tree.get("tags").and_then(Value::as_list).map(<[Value]>::len), Some(2));
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A node in a descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// String leaf. Decimal-looking strings are compared numerically by rules.
    String(String),
    /// Ordered list of nodes.
    List(Vec<Value>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// An empty map node.
    #[must_use]
    pub const fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Returns the string content of a leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of a list node.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a map node.
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a direct child of a map node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// Converts the tree back into JSON. Leaves are always emitted as JSON strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::empty_map()
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::String(String::new()),
            serde_json::Value::Bool(b) => Self::String(b.to_string()),
            serde_json::Value::Number(n) => Self::String(n.to_string()),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from(json!(null)), Value::from(""));
        assert_eq!(Value::from(json!(true)), Value::from("true"));
        assert_eq!(Value::from(json!(42)), Value::from("42"));
        assert_eq!(Value::from(json!(-0.25)), Value::from("-0.25"));
        assert_eq!(Value::from(json!("0xabc")), Value::from("0xabc"));
    }

    #[test]
    fn test_from_json_nested() {
        let tree = Value::from(json!({
            "nested": {"data": [{"address": "0xabc"}, {"address": "0xdef"}]}
        }));

        let data = tree.get("nested").and_then(|n| n.get("data")).unwrap();
        let items = data.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("address").and_then(Value::as_str), Some("0xdef"));
    }

    #[test]
    fn test_deserialize_through_json() {
        let tree: Value = serde_json::from_str(r#"{"gas": 21000, "to": "0x1"}"#).unwrap();
        assert_eq!(tree.get("gas").and_then(Value::as_str), Some("21000"));
    }

    #[test]
    fn test_serialize_untagged() {
        let tree = Value::from(json!({"a": ["x", {"b": "y"}]}));
        let text = serde_json::to_string(&tree).unwrap();
        assert_eq!(text, r#"{"a":["x",{"b":"y"}]}"#);
    }

    #[test]
    fn test_accessors_on_wrong_shape() {
        let leaf = Value::from("leaf");
        assert!(leaf.as_list().is_none());
        assert!(leaf.as_map().is_none());
        assert!(leaf.get("x").is_none());
        assert!(Value::default().as_str().is_none());
    }

    #[test]
    fn test_display_is_json() {
        let tree = Value::from(vec![Value::from("1"), Value::from("2")]);
        assert_eq!(tree.to_string(), r#"["1","2"]"#);
    }
}
