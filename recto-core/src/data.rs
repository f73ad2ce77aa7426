// Core value and type-tag definitions for recto

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::record::Record;

/// Core value types in recto
///
/// `Absent` is the absent-marker: the single sentinel for "no value",
/// distinct from every defined value of every kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Absent,
    Str(String),
    Num(f64),
    Bool(bool),
    Seq(Vec<Value>),
    Rec(Box<Record>),
}

/// Declared attribute types - a closed set of exactly six tags
///
/// Text codes are used by the compact attribute-spec format and the CLI
/// JSON format: `str`, `num`, `bool`, `seq`, `nul`, `rec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Str,
    Num,
    Bool,
    Seq,
    Nul,
    Rec,
}

impl TypeTag {
    /// Lenient code lookup. Unknown codes yield `None`; the compact
    /// attribute-spec parser relies on this to drop unrecognized types
    /// instead of rejecting them.
    pub fn parse(code: &str) -> Option<TypeTag> {
        match code {
            "str" => Some(TypeTag::Str),
            "num" => Some(TypeTag::Num),
            "bool" => Some(TypeTag::Bool),
            "seq" => Some(TypeTag::Seq),
            "nul" => Some(TypeTag::Nul),
            "rec" => Some(TypeTag::Rec),
            _ => None,
        }
    }

    /// Strict code lookup for contexts that validate. Unknown codes are an
    /// error, never silently false.
    pub fn from_code(code: &str) -> Result<TypeTag, SchemaError> {
        TypeTag::parse(code).ok_or_else(|| SchemaError::InvalidType(code.to_string()))
    }

    /// Whether `code` names one of the six known tags.
    pub fn is_valid_code(code: &str) -> bool {
        TypeTag::parse(code).is_some()
    }

    pub fn code(&self) -> &'static str {
        match self {
            TypeTag::Str => "str",
            TypeTag::Num => "num",
            TypeTag::Bool => "bool",
            TypeTag::Seq => "seq",
            TypeTag::Nul => "nul",
            TypeTag::Rec => "rec",
        }
    }

    /// Structural check: does `value` match this tag?
    ///
    /// `Nul` admits exactly the absent-marker; `Rec` requires a record
    /// value; the rest require the matching primitive kind.
    pub fn admits(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (TypeTag::Str, Value::Str(_))
                | (TypeTag::Num, Value::Num(_))
                | (TypeTag::Bool, Value::Bool(_))
                | (TypeTag::Seq, Value::Seq(_))
                | (TypeTag::Nul, Value::Absent)
                | (TypeTag::Rec, Value::Rec(_))
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Value {
    /// True for every value except the absent-marker.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Absent)
    }

    /// The record well-formedness predicate: a value is a well-formed
    /// record exactly when it carries one. Malformed shapes are
    /// unrepresentable here, so this never errors - it is just false for
    /// every other kind.
    pub fn is_record(&self) -> bool {
        matches!(self, Value::Rec(_))
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Rec(record) => Some(record),
            _ => None,
        }
    }

    /// Kind name for error messages and rendering.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Seq(_) => "sequence",
            Value::Rec(_) => "record",
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Num(_) => 1,
            Value::Str(_) => 2,
            Value::Seq(_) => 3,
            Value::Rec(_) => 4,
            Value::Absent => 5,
        }
    }

    /// Total "natural ordering" used by attribute sorting.
    ///
    /// Values of the same kind compare within the kind (numbers by IEEE
    /// total order, sequences element-wise); values of different kinds
    /// compare by a fixed kind rank, with absent sorting last.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Num(a), Value::Num(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Seq(a), Value::Seq(b)) => cmp_values(a, b),
            (Value::Rec(a), Value::Rec(b)) => a
                .schema()
                .type_name()
                .cmp(b.schema().type_name())
                .then_with(|| cmp_values(a.slots(), b.slots())),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    /// Convert to a JSON value. Records flatten to an object of their
    /// defined attributes; non-finite numbers become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent => serde_json::Value::Null,
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Num(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Seq(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Rec(record) => {
                let mut object = serde_json::Map::new();
                for (attr, slot) in record.schema().attributes().iter().zip(record.slots()) {
                    if slot.is_defined() {
                        object.insert(attr.name.clone(), slot.to_json());
                    }
                }
                serde_json::Value::Object(object)
            }
        }
    }

    /// Convert from a JSON value. Objects are not convertible here - a
    /// record needs a schema, so callers with one resolve objects
    /// themselves.
    pub fn from_json(json: &serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::Null => Some(Value::Absent),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Num),
            serde_json::Value::String(s) => Some(Value::Str(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Option<Vec<Value>>>()
                .map(Value::Seq),
            serde_json::Value::Object(_) => None,
        }
    }
}

fn cmp_values(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = x.natural_cmp(y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "-"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Num(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Rec(record) => write!(f, "<{} record>", record.schema().type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_codes_roundtrip() {
        for tag in [
            TypeTag::Str,
            TypeTag::Num,
            TypeTag::Bool,
            TypeTag::Seq,
            TypeTag::Nul,
            TypeTag::Rec,
        ] {
            assert_eq!(TypeTag::parse(tag.code()), Some(tag));
        }
    }

    #[test]
    fn test_unknown_code_is_lenient_or_strict() {
        assert_eq!(TypeTag::parse("widget"), None);
        assert!(!TypeTag::is_valid_code("widget"));
        assert!(matches!(
            TypeTag::from_code("widget"),
            Err(SchemaError::InvalidType(code)) if code == "widget"
        ));
    }

    #[test]
    fn test_admits_is_structural() {
        assert!(TypeTag::Str.admits(&Value::Str("x".to_string())));
        assert!(TypeTag::Num.admits(&Value::Num(1.5)));
        assert!(TypeTag::Bool.admits(&Value::Bool(false)));
        assert!(TypeTag::Seq.admits(&Value::Seq(Vec::new())));
        assert!(TypeTag::Nul.admits(&Value::Absent));

        assert!(!TypeTag::Str.admits(&Value::Num(1.0)));
        assert!(!TypeTag::Nul.admits(&Value::Bool(false)));
        assert!(!TypeTag::Rec.admits(&Value::Seq(Vec::new())));
    }

    #[test]
    fn test_natural_ordering_within_kind() {
        assert_eq!(
            Value::Num(1.0).natural_cmp(&Value::Num(2.0)),
            Ordering::Less
        );
        assert_eq!(
            Value::Str("bravo".to_string()).natural_cmp(&Value::Str("alpha".to_string())),
            Ordering::Greater
        );
        assert_eq!(
            Value::Seq(vec![Value::Num(1.0)]).natural_cmp(&Value::Seq(vec![
                Value::Num(1.0),
                Value::Num(2.0)
            ])),
            Ordering::Less
        );
    }

    #[test]
    fn test_absent_sorts_last() {
        assert_eq!(
            Value::Absent.natural_cmp(&Value::Str("zzz".to_string())),
            Ordering::Greater
        );
        assert_eq!(Value::Absent.natural_cmp(&Value::Absent), Ordering::Equal);
    }

    #[test]
    fn test_json_roundtrip_for_plain_values() {
        let value = Value::Seq(vec![
            Value::Num(3.0),
            Value::Str("ok".to_string()),
            Value::Bool(true),
            Value::Absent,
        ]);
        let json = value.to_json();
        assert_eq!(Value::from_json(&json), Some(value));
    }
}
