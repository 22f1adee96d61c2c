// Values bound to template variables

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Variable bindings, used both as expansion input and extraction output
pub type VariableValues = HashMap<String, VariableValue>;

/// A single string or number
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    fn from_json(value: serde_json::Value) -> Result<Self, InvalidValue> {
        match value {
            serde_json::Value::String(s) => Ok(Scalar::String(s)),
            serde_json::Value::Bool(b) => Ok(Scalar::String(b.to_string())),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Scalar::Integer(i)),
                None => n
                    .as_f64()
                    .map(Scalar::Float)
                    .ok_or_else(|| InvalidValue(format!("unrepresentable number {}", n))),
            },
            other => Err(InvalidValue(format!(
                "expected a string or number, got {}",
                other
            ))),
        }
    }
}

/// Canonical base-10 form: `1024`, `37.76`, `-122.427`. Floats never use an
/// exponent and whole floats print without `.0`.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(x) => serializer.serialize_f64(*x),
        }
    }
}

/// The value of one variable.
///
/// Maps keep insertion order for expansion, but two maps compare equal when
/// they hold the same pairs in any order.
#[derive(Debug, Clone)]
pub enum VariableValue {
    Null,
    Scalar(Scalar),
    List(Vec<Scalar>),
    Map(Vec<(String, Scalar)>),
}

impl VariableValue {
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        VariableValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        VariableValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// RFC 6570 treats null and empty composites as undefined
    pub fn is_defined(&self) -> bool {
        match self {
            VariableValue::Null => false,
            VariableValue::Scalar(_) => true,
            VariableValue::List(items) => !items.is_empty(),
            VariableValue::Map(pairs) => !pairs.is_empty(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, VariableValue::List(_) | VariableValue::Map(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            VariableValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, InvalidValue> {
        match value {
            serde_json::Value::Null => Ok(VariableValue::Null),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Scalar::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(VariableValue::List),
            serde_json::Value::Object(fields) => fields
                .into_iter()
                .map(|(k, v)| Scalar::from_json(v).map(|s| (k, s)))
                .collect::<Result<Vec<_>, _>>()
                .map(VariableValue::Map),
            scalar => Scalar::from_json(scalar).map(VariableValue::Scalar),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Serializing into serde_json::Value cannot fail for these shapes
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn same_pairs(a: &[(String, Scalar)], b: &[(String, Scalar)]) -> bool {
    a.len() == b.len() && a.iter().all(|pair| b.contains(pair)) && b.iter().all(|pair| a.contains(pair))
}

impl PartialEq for VariableValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VariableValue::Null, VariableValue::Null) => true,
            (VariableValue::Scalar(a), VariableValue::Scalar(b)) => a == b,
            (VariableValue::List(a), VariableValue::List(b)) => a == b,
            (VariableValue::Map(a), VariableValue::Map(b)) => same_pairs(a, b),
            _ => false,
        }
    }
}

impl From<Scalar> for VariableValue {
    fn from(value: Scalar) -> Self {
        VariableValue::Scalar(value)
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Scalar(value.into())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        VariableValue::Scalar(value.into())
    }
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        VariableValue::Scalar(value.into())
    }
}

impl From<i32> for VariableValue {
    fn from(value: i32) -> Self {
        VariableValue::Scalar(value.into())
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Scalar(value.into())
    }
}

impl Serialize for VariableValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VariableValue::Null => serializer.serialize_unit(),
            VariableValue::Scalar(s) => s.serialize(serializer),
            VariableValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            VariableValue::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for VariableValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        VariableValue::from_json(json).map_err(de::Error::custom)
    }
}

/// A JSON value that has no variable-value form (e.g. nested arrays)
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidValue(String);

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid variable value: {}", self.0)
    }
}

impl std::error::Error for InvalidValue {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_canonical_numbers() {
        assert_eq!(Scalar::Integer(1024).to_string(), "1024");
        assert_eq!(Scalar::Float(37.76).to_string(), "37.76");
        assert_eq!(Scalar::Float(-122.427).to_string(), "-122.427");
        assert_eq!(Scalar::Float(5.0).to_string(), "5");
        assert_eq!(Scalar::Float(1e21).to_string(), "1000000000000000000000");
    }

    #[test]
    fn test_from_json() {
        let values: VariableValues = serde_json::from_value(json!({
            "var": "value",
            "n": 42,
            "f": 0.5,
            "list": ["red", "green"],
            "keys": {"semi": ";"},
            "nothing": null
        }))
        .unwrap();

        assert_eq!(values["var"], VariableValue::from("value"));
        assert_eq!(values["n"], VariableValue::from(42));
        assert_eq!(values["f"], VariableValue::from(0.5));
        assert_eq!(values["list"], VariableValue::list(["red", "green"]));
        assert_eq!(values["keys"], VariableValue::map([("semi", ";")]));
        assert_eq!(values["nothing"], VariableValue::Null);
    }

    #[test]
    fn test_nested_composites_are_rejected() {
        assert!(VariableValue::from_json(json!([["a"]])).is_err());
        assert!(VariableValue::from_json(json!({"a": {"b": "c"}})).is_err());
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a = VariableValue::map([("a", "1"), ("b", "2")]);
        let b = VariableValue::map([("b", "2"), ("a", "1")]);
        let c = VariableValue::map([("a", "1")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(VariableValue::list(["1", "2"]), VariableValue::list(["2", "1"]));
    }

    #[test]
    fn test_to_json() {
        let value = VariableValue::map([("k", Scalar::from("v")), ("n", Scalar::from(1))]);
        assert_eq!(value.to_json(), json!({"k": "v", "n": 1}));
        assert_eq!(VariableValue::Null.to_json(), json!(null));
    }

    #[test]
    fn test_is_defined() {
        assert!(!VariableValue::Null.is_defined());
        assert!(!VariableValue::List(vec![]).is_defined());
        assert!(!VariableValue::Map(vec![]).is_defined());
        assert!(VariableValue::from("").is_defined());
    }
}
