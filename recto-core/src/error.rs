// Error types for recto

use std::error::Error;
use std::fmt;

use crate::data::TypeTag;

/// Umbrella error across recto layers
#[derive(Debug)]
pub enum RecordError {
    Schema(SchemaError),
    Access(AccessError),
}

/// Schema construction and type-code errors
#[derive(Debug)]
pub enum SchemaError {
    /// Schema build requested with neither attribute specs nor a base
    /// record.
    MissingSpecification,
    /// A type code outside the closed six-member set was used in a
    /// context requiring validation.
    InvalidType(String),
}

/// Accessor protocol errors
#[derive(Debug)]
pub enum AccessError {
    /// The named attribute is not in the record's schema.
    UnknownAttribute(String),
    /// A value failed validation against the attribute's declared type.
    TypeMismatch {
        attribute: String,
        expected: TypeTag,
        actual: String,
    },
    /// The name addresses the reserved schema slot, which no accessor may
    /// write.
    CannotModifySchema(String),
}

// Error trait implementations

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RecordError::Schema(e) => Some(e),
            RecordError::Access(e) => Some(e),
        }
    }
}

impl Error for SchemaError {}
impl Error for AccessError {}

// Display implementations

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Schema(e) => write!(f, "Schema error: {}", e),
            RecordError::Access(e) => write!(f, "Access error: {}", e),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MissingSpecification => {
                write!(
                    f,
                    "Schema build requires either attribute specifications or a base record"
                )
            }
            SchemaError::InvalidType(code) => {
                write!(f, "Invalid type code: {}", code)
            }
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::UnknownAttribute(name) => {
                write!(f, "Unknown attribute: {}", name)
            }
            AccessError::TypeMismatch {
                attribute,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Type mismatch for attribute '{}': expected {}, got {}",
                    attribute, expected, actual
                )
            }
            AccessError::CannotModifySchema(name) => {
                write!(f, "Cannot modify the reserved schema slot: {}", name)
            }
        }
    }
}

// Convenience From implementations for error composition

impl From<SchemaError> for RecordError {
    fn from(error: SchemaError) -> Self {
        RecordError::Schema(error)
    }
}

impl From<AccessError> for RecordError {
    fn from(error: AccessError) -> Self {
        RecordError::Access(error)
    }
}
