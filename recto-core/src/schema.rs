// Schema layer - the named "table of contents" defining a record type

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{TypeTag, Value};
use crate::error::SchemaError;
use crate::record::Record;

/// One attribute descriptor: name, optional declared type, default.
///
/// Immutable once part of a schema. A `tag` of `None` means the attribute
/// is untyped; a `default` of `Value::Absent` means no declared default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub tag: Option<TypeTag>,
    pub default: Value,
}

/// Attribute specification accepted by the schema builder.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrSpec {
    /// Compact string form `name[=type[=default]]`. The default may itself
    /// contain `=` characters.
    Compact(String),
    /// Full form. The default passes through unparsed, which is how
    /// defaults that are not representable as short strings (nested
    /// sequences, nested records) get in.
    Full {
        name: String,
        tag: Option<TypeTag>,
        default: Value,
    },
}

impl From<&str> for AttrSpec {
    fn from(spec: &str) -> Self {
        AttrSpec::Compact(spec.to_string())
    }
}

impl AttrSpec {
    pub fn compact(spec: &str) -> AttrSpec {
        AttrSpec::Compact(spec.to_string())
    }

    pub fn full(name: &str, tag: Option<TypeTag>, default: Value) -> AttrSpec {
        AttrSpec::Full {
            name: name.to_string(),
            tag,
            default,
        }
    }

    /// Typed attribute with no default.
    pub fn typed(name: &str, tag: TypeTag) -> AttrSpec {
        AttrSpec::full(name, Some(tag), Value::Absent)
    }

    /// Normalize this specification into an attribute descriptor.
    fn normalize(&self) -> Attribute {
        match self {
            AttrSpec::Compact(spec) => parse_compact(spec),
            AttrSpec::Full { name, tag, default } => Attribute {
                name: name.clone(),
                tag: *tag,
                default: coerce_default(*tag, default.clone()),
            },
        }
    }
}

/// Parse the compact `name[=type[=default]]` form.
///
/// An unrecognized type code is silently dropped to "untyped" - required
/// compatibility behavior, not a validation error. The default substring
/// is re-parsed into the value domain according to the recognized tag.
fn parse_compact(spec: &str) -> Attribute {
    let mut parts = spec.splitn(3, '=');
    let name = parts.next().unwrap_or("").to_string();
    let tag = parts.next().and_then(TypeTag::parse);
    let default_text = parts.next();

    let default = match (tag, default_text) {
        (Some(TypeTag::Str), Some(text)) => Value::Str(text.to_string()),
        (Some(TypeTag::Num), Some(text)) => text
            .parse::<f64>()
            .map(Value::Num)
            .unwrap_or(Value::Absent),
        (Some(TypeTag::Bool), Some("true")) => Value::Bool(true),
        (Some(TypeTag::Bool), Some("false")) => Value::Bool(false),
        (Some(TypeTag::Bool), Some(_)) => Value::Absent,
        // Sequence- and record-typed attributes default to the empty
        // sequence; the compact form cannot spell a richer default.
        (Some(TypeTag::Seq), _) | (Some(TypeTag::Rec), _) => Value::Seq(Vec::new()),
        (Some(TypeTag::Nul), _) => Value::Absent,
        (None, Some(text)) => Value::Str(text.to_string()),
        (_, None) => Value::Absent,
    };

    Attribute {
        name,
        tag,
        default: coerce_default(tag, default),
    }
}

/// A computed default that fails the declared type's structural check is
/// forced back to absent - except sequence- and record-typed attributes,
/// which fall back to their empty-sequence convention instead.
fn coerce_default(tag: Option<TypeTag>, default: Value) -> Value {
    let Some(tag) = tag else { return default };
    if !default.is_defined() || tag.admits(&default) {
        return default;
    }
    match tag {
        TypeTag::Seq | TypeTag::Rec => Value::Seq(Vec::new()),
        _ => Value::Absent,
    }
}

/// A record type's schema: the type name plus an ordered attribute list.
///
/// Attribute names are unique within a schema and their order is fixed
/// for the schema's lifetime. The name-to-slot index is built once here
/// so attribute lookup never re-derives the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SchemaDef")]
pub struct Schema {
    name: String,
    attributes: Vec<Attribute>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// Serialized shape of a schema; the slot index is rebuilt on the way in.
#[derive(Deserialize)]
struct SchemaDef {
    name: String,
    attributes: Vec<Attribute>,
}

impl From<SchemaDef> for Schema {
    fn from(def: SchemaDef) -> Schema {
        Schema::from_parts(def.name, def.attributes)
    }
}

impl Schema {
    /// Build a schema from attribute specifications, or inherit one
    /// wholesale from a base record.
    ///
    /// With a base record the result is exactly the base's schema and
    /// `specs` is ignored entirely, which lets call sites omit the
    /// attribute list when cloning. With neither specs nor a base the
    /// build fails with `MissingSpecification`.
    pub fn build(
        type_name: &str,
        specs: &[AttrSpec],
        base: Option<&Record>,
    ) -> Result<Schema, SchemaError> {
        if let Some(base) = base {
            return Ok(base.schema().clone());
        }
        if specs.is_empty() {
            return Err(SchemaError::MissingSpecification);
        }

        let mut attributes: Vec<Attribute> = Vec::with_capacity(specs.len());
        for spec in specs {
            let attr = spec.normalize();
            // A later spec for the same name replaces the earlier
            // descriptor; names stay unique and keep their first position.
            match attributes.iter().position(|a| a.name == attr.name) {
                Some(i) => attributes[i] = attr,
                None => attributes.push(attr),
            }
        }
        Ok(Schema::from_parts(type_name.to_string(), attributes))
    }

    fn from_parts(name: String, attributes: Vec<Attribute>) -> Schema {
        let index = attributes
            .iter()
            .enumerate()
            .map(|(slot, attr)| (attr.name.clone(), slot))
            .collect();
        Schema {
            name,
            attributes,
            index,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.name
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Slot position for an attribute name. The reserved schema slot is
    /// not an attribute and never resolves here.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        if self.is_reserved(name) {
            return None;
        }
        self.index.get(name).copied()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.slot_of(name).map(|slot| &self.attributes[slot])
    }

    /// Whether `name` addresses the reserved schema slot. The type name
    /// shadows any attribute that happens to share it.
    pub fn is_reserved(&self, name: &str) -> bool {
        name == self.name
    }
}
