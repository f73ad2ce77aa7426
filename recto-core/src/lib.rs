// recto-core - schema-described immutable records

//! Named, schema-described, immutable records.
//!
//! A [`schema::Schema`] is the "table of contents" for a record type: an
//! ordered list of attribute descriptors (name, optional declared type,
//! default). A [`record::Record`] pairs a shared schema with one value
//! slot per attribute; reads resolve through an explicit precedence chain
//! and every "mutation" returns a brand-new record. The [`query`] module
//! selects, sorts, and groups collections of records by attribute value.

pub mod data;
pub mod error;
pub mod query;
pub mod record;
pub mod render;
pub mod schema;
