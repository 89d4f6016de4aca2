//! Data model for field-mapping configurations.
//!
//! A [`MappingSet`] is what the outer editing layer hands to the compiler: an
//! ordered list of [`Mapping`] rows, stylesheet-scoped [`Variable`]s and the
//! options that only some output formats read (root element, record path).
//! The JSON shape accepted by serde uses the camelCase keys of the editor.

pub mod attribute;
pub mod error;
pub mod mapping;
pub mod namespace;

pub use attribute::{AttributeSpec, AttributeValue, Variable, VariableValue};
pub use error::MappingError;
pub use mapping::{FieldType, Mapping, MappingSet, RootElement, SourceType, ValueType};
pub use namespace::Namespaces;
