//! Compiles field-mapping configurations into XSLT stylesheets.
//!
//! A [`MappingSet`](xslmap_types::MappingSet) binds source XML paths to target
//! paths. Generation normalizes the source paths, rebuilds the output tree
//! from the flat target paths, and emits a stylesheet for one of three output
//! shapes: hierarchical XML (XSLT 1.0), a JSON object (XSLT 3.0 maps) or
//! delimited text (XSLT 1.0).

pub mod diagnostics;
pub mod emitters;
pub mod error;
pub mod generator;
pub mod hierarchy;
pub mod policy;
pub mod prepare;
pub mod validator;
pub mod writer;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, Severity};
pub use error::{GenerateError, ValidationError};
pub use generator::{
    GenerateOptions, GenerationReport, Generator, JsonValueMode, OutputFormat, generate,
};
pub use hierarchy::{Hierarchy, HierarchyNode};
pub use validator::{ValidationReport, validate, validate_format};
