//! Value Tree
//!
//! The materialized result of a `load`/`loads` call: a recursively-nested
//! mapping of strings, lists, and sub-mappings. Keys preserve insertion
//! order, so the mapping is backed by `IndexMap` rather than `HashMap` the
//! same way the teacher's jq `Value::Object` variant is
//! (`indexmap::IndexMap<String, Value>` in
//! `src/commands/query_engine/value.rs`).

use indexmap::IndexMap;

/// A materialized configuration value: a scalar string, an ordered list of
/// values, or a nested ordered mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Used only for unset `flagbits` entries (spec §4.1): every predefined
    /// flag name appears in the emitted mapping, set to its configured value
    /// or to this null scalar when absent from the matched set.
    Null,
    Scalar(String),
    List(Vec<Value>),
    Table(IndexMap<String, Value>),
}

impl Value {
    pub fn empty_table() -> Self {
        Value::Table(IndexMap::new())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Table(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Table(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Convert to a `serde_json::Value`, used by the CLI's JSON emission.
    pub fn to_serde_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Scalar(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_serde_json).collect())
            }
            Value::Table(map) => {
                let obj: serde_json::Map<String, serde_json::Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_serde_json()))
                    .collect();
                serde_json::Value::Object(obj)
            }
        }
    }

    /// Build a `Value` tree from a `serde_json::Value`, used by the CLI's
    /// `--json-input` surface to read a previously-dumped tree back in.
    pub fn from_serde_json(v: serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Scalar(if b { "1".to_string() } else { "0".to_string() }),
            serde_json::Value::Number(n) => Value::Scalar(n.to_string()),
            serde_json::Value::String(s) => Value::Scalar(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_serde_json).collect())
            }
            serde_json::Value::Object(obj) => {
                let mut map = IndexMap::new();
                for (k, v) in obj {
                    map.insert(k, Value::from_serde_json(v));
                }
                Value::Table(map)
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Table(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_roundtrips_through_json() {
        let v = Value::Scalar("stein".to_string());
        assert_eq!(v.to_serde_json(), serde_json::json!("stein"));
    }

    #[test]
    fn table_preserves_insertion_order_through_json() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::Scalar("2".to_string()));
        map.insert("a".to_string(), Value::Scalar("1".to_string()));
        let v = Value::Table(map);
        let json = v.to_serde_json();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn json_roundtrip_preserves_shape() {
        let mut inner = IndexMap::new();
        inner.insert("x".to_string(), Value::List(vec![Value::Scalar("1".into()), Value::Scalar("2".into())]));
        let v = Value::Table(inner);
        let json = v.to_serde_json();
        let back = Value::from_serde_json(json);
        assert_eq!(
            back.as_table().unwrap().get("x").unwrap().as_list().unwrap().len(),
            2
        );
    }

    #[test]
    fn null_roundtrips_through_json() {
        let v = Value::Null;
        assert_eq!(v.to_serde_json(), serde_json::Value::Null);
        assert_eq!(Value::from_serde_json(serde_json::Value::Null), Value::Null);
    }
}
