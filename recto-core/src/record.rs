// Record construction and the copy-on-write accessor protocol

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{TypeTag, Value};
use crate::error::{AccessError, RecordError};
use crate::schema::{AttrSpec, Schema};

/// An immutable instance of a schema: one value slot per declared
/// attribute, in schema order.
///
/// The schema is shared across every record built from it; "mutation"
/// (`set`/`unset`) produces a brand-new record with all other slots
/// copied verbatim, so any number of holders may read the same record
/// concurrently without coordination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    schema: Arc<Schema>,
    slots: Vec<Value>,
}

/// Sparse attribute/value input accepted by the constructor: either
/// ready-made pairs, or one flat alternating `name, value, ...` sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Vlist {
    Pairs(Vec<(String, Value)>),
    Flat(Vec<Value>),
}

impl Vlist {
    pub fn empty() -> Vlist {
        Vlist::Pairs(Vec::new())
    }

    pub fn pairs<N: Into<String>>(pairs: Vec<(N, Value)>) -> Vlist {
        Vlist::Pairs(pairs.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    /// Auto-detect the vlist shape of a raw value sequence: a uniform
    /// second level of two-element `(name, value)` sequences is taken as
    /// pairs, anything else as one flat alternating sequence.
    pub fn detect(items: Vec<Value>) -> Vlist {
        let uniform_pairs = !items.is_empty()
            && items.iter().all(|item| {
                matches!(item, Value::Seq(pair)
                    if pair.len() == 2 && matches!(pair[0], Value::Str(_)))
            });
        if uniform_pairs {
            let pairs = items
                .into_iter()
                .map(|item| match item {
                    Value::Seq(mut pair) => {
                        let value = pair.pop().unwrap_or(Value::Absent);
                        match pair.pop() {
                            Some(Value::Str(name)) => (name, value),
                            _ => unreachable!("shape checked above"),
                        }
                    }
                    _ => unreachable!("shape checked above"),
                })
                .collect();
            Vlist::Pairs(pairs)
        } else {
            Vlist::Flat(items)
        }
    }

    /// Normalize into `(name, value)` pairs.
    ///
    /// Pairs pass through as-is. A flat sequence converts pairwise: a pair
    /// whose value is the absent-marker is discarded, a name that is not a
    /// string is skipped, and a trailing unpaired name is dropped.
    pub fn normalize(self) -> Vec<(String, Value)> {
        match self {
            Vlist::Pairs(pairs) => pairs,
            Vlist::Flat(items) => {
                let mut pairs = Vec::with_capacity(items.len() / 2);
                let mut items = items.into_iter();
                while let Some(name) = items.next() {
                    let Some(value) = items.next() else { break };
                    if !value.is_defined() {
                        continue;
                    }
                    if let Value::Str(name) = name {
                        pairs.push((name, value));
                    }
                }
                pairs
            }
        }
    }
}

/// Resolution precedence for one attribute read, first defined wins:
/// (1) the stored value, (2) the call-site default, (3) the schema's
/// declared default when considered, (4) the empty sequence for
/// sequence-typed attributes, (5) the absent-marker.
///
/// Kept as one explicit pure function so the order stays auditable.
pub fn resolve_value(
    stored: &Value,
    call_default: Option<&Value>,
    schema_default: &Value,
    tag: Option<TypeTag>,
    consider_schema_default: bool,
) -> Value {
    if stored.is_defined() {
        return stored.clone();
    }
    if let Some(default) = call_default {
        if default.is_defined() {
            return default.clone();
        }
    }
    if consider_schema_default && schema_default.is_defined() {
        return schema_default.clone();
    }
    // Sequence-typed attributes never read back as absent.
    if tag == Some(TypeTag::Seq) {
        return Value::Seq(Vec::new());
    }
    Value::Absent
}

impl Record {
    /// Construct a record from a schema specification and a sparse vlist,
    /// optionally cloning a base record.
    ///
    /// With a base record the schema is the base's schema (specs ignored)
    /// and unnamed slots keep the base's values; otherwise every slot
    /// starts absent. Vlist pairs apply in order: a name not in the
    /// schema is silently ignored, so newer vlists keep working against
    /// older schemas, and the last value applied for a name wins.
    pub fn construct(
        type_name: &str,
        specs: &[AttrSpec],
        values: Vlist,
        base: Option<&Record>,
    ) -> Result<Record, RecordError> {
        let (schema, mut slots) = match base {
            Some(base) => (Arc::clone(&base.schema), base.slots.clone()),
            None => {
                let schema = Arc::new(Schema::build(type_name, specs, None)?);
                let slots = vec![Value::Absent; schema.len()];
                (schema, slots)
            }
        };
        for (name, value) in values.normalize() {
            if let Some(slot) = schema.slot_of(&name) {
                slots[slot] = value;
            }
        }
        Ok(Record { schema, slots })
    }

    /// The all-absent record for a schema.
    pub fn from_schema(schema: Arc<Schema>) -> Record {
        let slots = vec![Value::Absent; schema.len()];
        Record { schema, slots }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The shared schema handle, for building sibling records cheaply.
    pub fn schema_handle(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Raw value slots, in schema order.
    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    /// Total length counting the reserved schema slot, so it is always
    /// one more than the attribute count.
    pub fn len(&self) -> usize {
        self.slots.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resolve an attribute with the full precedence chain and schema
    /// defaults considered.
    pub fn get(&self, name: &str) -> Result<Value, AccessError> {
        self.get_with(name, None, true)
    }

    /// Resolve an attribute with a call-site default, which outranks the
    /// schema default.
    pub fn get_or(&self, name: &str, call_default: &Value) -> Result<Value, AccessError> {
        self.get_with(name, Some(call_default), true)
    }

    /// Resolve an attribute from its stored value only - schema defaults
    /// excluded. The query engine's definedness tests use this.
    pub fn get_explicit(&self, name: &str) -> Result<Value, AccessError> {
        self.get_with(name, None, false)
    }

    /// The fully-parameterized read underlying `get`/`get_or`/
    /// `get_explicit`.
    pub fn get_with(
        &self,
        name: &str,
        call_default: Option<&Value>,
        consider_schema_default: bool,
    ) -> Result<Value, AccessError> {
        let slot = self.lookup(name)?;
        let attr = &self.schema.attributes()[slot];
        Ok(resolve_value(
            &self.slots[slot],
            call_default,
            &attr.default,
            attr.tag,
            consider_schema_default,
        ))
    }

    /// Return a new record with one slot replaced; the original is
    /// untouched. Setting the absent-marker clears the slot exactly like
    /// `unset` - there is no implicit-get fallback here.
    pub fn set(&self, name: &str, value: Value) -> Result<Record, AccessError> {
        let slot = self.lookup_writable(name)?;
        if value.is_defined() {
            let attr = &self.schema.attributes()[slot];
            if let Some(tag) = attr.tag {
                if !tag.admits(&value) {
                    return Err(AccessError::TypeMismatch {
                        attribute: name.to_string(),
                        expected: tag,
                        actual: value.kind().to_string(),
                    });
                }
            }
        }
        let mut next = self.clone();
        next.slots[slot] = value;
        Ok(next)
    }

    /// Return a new record with the slot set back to the absent-marker,
    /// unconditionally.
    pub fn unset(&self, name: &str) -> Result<Record, AccessError> {
        let slot = self.lookup_writable(name)?;
        let mut next = self.clone();
        next.slots[slot] = Value::Absent;
        Ok(next)
    }

    /// Check every defined slot against its declared type.
    pub fn check_types(&self) -> Result<(), AccessError> {
        for (attr, value) in self.schema.attributes().iter().zip(&self.slots) {
            if !value.is_defined() {
                continue;
            }
            if let Some(tag) = attr.tag {
                if !tag.admits(value) {
                    return Err(AccessError::TypeMismatch {
                        attribute: attr.name.clone(),
                        expected: tag,
                        actual: value.kind().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<usize, AccessError> {
        self.schema
            .slot_of(name)
            .ok_or_else(|| AccessError::UnknownAttribute(name.to_string()))
    }

    fn lookup_writable(&self, name: &str) -> Result<usize, AccessError> {
        if self.schema.is_reserved(name) {
            return Err(AccessError::CannotModifySchema(name.to_string()));
        }
        self.lookup(name)
    }
}
