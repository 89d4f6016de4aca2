//! Field-mapping to XSLT compiler.
//!
//! This crate ties the workspace together: it re-exports the data model, the
//! path utilities and the generator, and adds project-file loading for the
//! `xslmap` command line tool.

pub mod config;
pub mod error;

pub use config::ProjectConfig;
pub use error::AppError;

pub use xslmap_types::{
    AttributeSpec, AttributeValue, FieldType, Mapping, MappingError, MappingSet, Namespaces,
    RootElement, SourceType, ValueType, Variable, VariableValue,
};
pub use xslmap_xpath::{XPathError, normalize, normalize_path, parse_source_path};
pub use xslmap_xslt::{
    CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, GenerateError, GenerateOptions,
    GenerationReport, Generator, JsonValueMode, LogSink, OutputFormat, Severity, ValidationError,
    ValidationReport, generate, validate, validate_format,
};
