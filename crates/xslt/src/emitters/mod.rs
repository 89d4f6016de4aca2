//! Per-format stylesheet emitters and the helpers they share.

mod flat;
mod json;
mod xml;

pub use flat::FlatEmitter;
pub use json::JsonEmitter;
pub use xml::XmlEmitter;

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::GenerateError;
use crate::generator::GenerateOptions;
use crate::hierarchy::{FieldRef, Hierarchy};
use crate::writer::{
    StylesheetWriter, XSL_NAMESPACE, element_name, escape_attr, escape_avt_literal,
    variable_name,
};
use std::fmt;
use xslmap_types::{AttributeSpec, AttributeValue, Mapping, MappingSet, Namespaces, ValueType};
use xslmap_xpath::{SourcePath, relative_to};

/// Everything an emitter reads during one generation run.
pub struct EmitInput<'a> {
    pub set: &'a MappingSet,
    /// Normalized and completed mappings, in input order followed by placeholders.
    pub mappings: &'a [Mapping],
    pub options: &'a GenerateOptions,
    pub sink: &'a dyn DiagnosticSink,
}

/// Turns prepared mappings into the text of a stylesheet.
pub trait StylesheetEmitter {
    fn emit(&self, input: &EmitInput<'_>) -> Result<String, GenerateError>;
}

/// Where a field's output value comes from once its context is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueSource<'m> {
    Literal(&'m str),
    Empty,
    Select(String),
}

pub(crate) fn value_source<'m>(field: &'m FieldRef<'_>, loops: &[String]) -> ValueSource<'m> {
    match field.mapping.value_type {
        ValueType::Hardcoded => {
            ValueSource::Literal(field.mapping.hardcoded_value.as_deref().unwrap_or_default())
        }
        ValueType::Empty => ValueSource::Empty,
        ValueType::Xpath => ValueSource::Select(value_select(&field.source, loops)),
    }
}

/// The expression reading a field's value.
///
/// Beneath an enclosing loop the path is made relative to the loop's context
/// node. Otherwise attributes are read as `@name` and elements through their
/// full path.
pub(crate) fn value_select(source: &SourcePath, loops: &[String]) -> String {
    let full = match source {
        SourcePath::Attribute {
            parent_path,
            attribute_name,
        } => format!("{}/@{}", parent_path, attribute_name),
        SourcePath::Element { xpath, .. } => xpath.clone(),
    };
    loops
        .last()
        .and_then(|context| relative_to(&full, context))
        .unwrap_or_else(|| source.value_ref())
}

/// The absolute path a repeating field or container iterates over.
pub(crate) fn repetition_path(field: &FieldRef<'_>) -> String {
    if let Some(path) = field.mapping.for_each() {
        return path.to_string();
    }
    match &field.source {
        SourcePath::Attribute { parent_path, .. } if !parent_path.is_empty() => {
            parent_path.clone()
        }
        SourcePath::Attribute { .. } => ".".to_string(),
        SourcePath::Element { xpath, .. } => xpath.clone(),
    }
}

/// The `select` of a `for-each` over `path`, relative to the enclosing loop if possible.
pub(crate) fn loop_select(path: &str, loops: &[String]) -> String {
    loops
        .last()
        .and_then(|context| relative_to(path, context))
        .unwrap_or_else(|| path.to_string())
}

/// Warns about mappings whose value is lost because their target path is a container.
pub(crate) fn report_shadowed(hierarchy: &Hierarchy<'_>, sink: &dyn DiagnosticSink) {
    for mapping in &hierarchy.shadowed {
        sink.report(Diagnostic::warning(
            DiagnosticKind::Unsupported,
            format!(
                "value of '{}' is not rendered: target '{}' is a container",
                mapping.source_path,
                mapping.effective_target_path()
            ),
        ));
    }
}

/// ` name="value"` markup for one attribute.
pub(crate) fn attribute_markup(attribute: &AttributeSpec) -> String {
    let value = match &attribute.value {
        AttributeValue::Hardcoded(v) => escape_avt_literal(v),
        AttributeValue::Variable(var) => format!("{{${}}}", escape_attr(&variable_name(var))),
        AttributeValue::XPath(expr) => format!("{{{}}}", escape_attr(expr)),
    };
    format!(" {}=\"{}\"", element_name(&attribute.name), value)
}

/// Writes the XML declaration and the opening `xsl:stylesheet` tag.
///
/// Prefixed namespaces are declared with `xmlns:` and listed in
/// `exclude-result-prefixes`; the `default` entry becomes a bare `xmlns`.
pub(crate) fn open_stylesheet(
    w: &mut StylesheetWriter,
    version: &str,
    namespaces: &Namespaces,
    extra: &[(&str, &str)],
) -> fmt::Result {
    let mut tag = format!(
        "<xsl:stylesheet version=\"{}\" xmlns:xsl=\"{}\"",
        escape_attr(version),
        XSL_NAMESPACE
    );
    let mut excluded = Vec::new();

    for &(prefix, uri) in extra {
        tag.push_str(&format!(" xmlns:{}=\"{}\"", prefix, escape_attr(uri)));
        excluded.push(prefix);
    }
    for (prefix, uri) in namespaces.prefixed() {
        if prefix == "xsl" || extra.iter().any(|(p, _)| *p == prefix) {
            continue;
        }
        tag.push_str(&format!(" xmlns:{}=\"{}\"", prefix, escape_attr(uri)));
        excluded.push(prefix);
    }
    if let Some(uri) = namespaces.default_uri() {
        tag.push_str(&format!(" xmlns=\"{}\"", escape_attr(uri)));
    }
    if !excluded.is_empty() {
        tag.push_str(&format!(" exclude-result-prefixes=\"{}\"", excluded.join(" ")));
    }
    tag.push('>');

    w.line("<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    w.open(&tag)
}

pub(crate) fn close_stylesheet(w: &mut StylesheetWriter) -> fmt::Result {
    w.close("</xsl:stylesheet>")
}
