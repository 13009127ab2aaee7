//! A JSON parser driven entirely by a declarative grammar table.
//!
//! Text is scanned into tokens, which a generic shift-reduce engine folds into a single
//! [JsonValue] by consulting the productions in [grammar::JSON_GRAMMAR]. Parsed values may then be
//! projected onto native Rust types through [decode::Decodable].
//!
//! ```
//! let value = chisel_json_sr::parse(r#"{"name" : "renault", "value" : [1239, 123.45]}"#).unwrap();
//! assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("renault"));
//! ```
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::errors::ParserResult;
use crate::parser::Parser;

pub mod coords;
pub mod decode;
pub mod encodings;
pub mod engine;
pub mod errors;
pub mod grammar;
pub mod parser;
pub mod pointer;
pub mod scanner;
pub mod symbols;
#[cfg(test)]
mod test_macros;

pub use decode::{decode, Decodable, Shape};

/// Parse a complete piece of JSON text into a single [JsonValue]
pub fn parse(text: &str) -> ParserResult<JsonValue> {
    Parser::default().parse_str(text)
}

/// The tag carried by every [JsonValue]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Null => write!(f, "null"),
            ValueKind::Array => write!(f, "array"),
            ValueKind::Object => write!(f, "object"),
        }
    }
}

/// Basic enumeration of different Json values
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    /// Raw string value, exactly as it appeared between the quotes
    String(String),
    /// Numeric value
    Number(f64),
    /// Canonical boolean value
    Boolean(bool),
    /// Canonical null value
    #[default]
    Null,
    /// Array of values
    Array(Vec<JsonValue>),
    /// Map of values. Later duplicate keys replace earlier ones
    Object(BTreeMap<String, JsonValue>),
}

impl JsonValue {
    /// The tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Number(_) => ValueKind::Number,
            JsonValue::Boolean(_) => ValueKind::Boolean,
            JsonValue::Null => ValueKind::Null,
            JsonValue::Array(_) => ValueKind::Array,
            JsonValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, JsonValue>> {
        match self {
            JsonValue::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Look up a member of an object value. Always [None] for any other kind of value
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|members| members.get(key))
    }
}

/// Writes compact JSON text. Strings are written back raw, so the output re-scans to the same
/// value.
impl Display for JsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonValue::String(s) => write!(f, "\"{}\"", s),
            JsonValue::Number(n) => write!(f, "{}", n),
            JsonValue::Boolean(b) => write!(f, "{}", b),
            JsonValue::Null => write!(f, "null"),
            JsonValue::Array(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            JsonValue::Object(members) => {
                write!(f, "{{")?;
                for (index, (key, value)) in members.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{}\":{}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, JsonValue, ValueKind};
    use std::collections::BTreeMap;

    #[test]
    fn should_report_value_kinds() {
        assert_eq!(JsonValue::Null.kind(), ValueKind::Null);
        assert_eq!(JsonValue::Number(1.0).kind(), ValueKind::Number);
        assert_eq!(JsonValue::Array(vec![]).kind(), ValueKind::Array);
        assert_eq!(JsonValue::Object(BTreeMap::new()).kind(), ValueKind::Object);
    }

    #[test]
    fn should_write_compact_json() {
        let mut members = BTreeMap::new();
        members.insert("b".to_string(), JsonValue::Boolean(true));
        members.insert(
            "a".to_string(),
            JsonValue::Array(vec![JsonValue::Number(1239.0), JsonValue::Number(-0.5)]),
        );
        members.insert("c".to_string(), JsonValue::Null);
        members.insert("d".to_string(), JsonValue::String("x y".to_string()));
        let value = JsonValue::Object(members);
        assert_eq!(
            value.to_string(),
            r#"{"a":[1239,-0.5],"b":true,"c":null,"d":"x y"}"#
        );
    }

    #[test]
    fn should_access_members() {
        let value = parse(r#"{"name" : "renault", "token" : true, "hello" : null}"#).unwrap();
        assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("renault"));
        assert_eq!(value.get("token").and_then(|v| v.as_bool()), Some(true));
        assert!(value.get("hello").unwrap().is_null());
        assert!(value.get("missing").is_none());
        assert!(JsonValue::Number(1.0).get("name").is_none());
    }
}
