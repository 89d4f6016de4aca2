//! Structural checks on generated stylesheet text.

use crate::error::ValidationError;
use crate::generator::OutputFormat;
use crate::writer::XSL_NAMESPACE;
use roxmltree::{Document, Node};
use serde::Serialize;

/// Outcome of validating one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub error: Option<String>,
}

impl ValidationReport {
    fn from_result(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(e) => {
                log::debug!("Stylesheet rejected: {}", e);
                Self {
                    valid: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Checks that `text` parses and that its root element is named `stylesheet`.
pub fn check_stylesheet(text: &str) -> Result<(), ValidationError> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "stylesheet" {
        return Err(ValidationError::MalformedOutput(format!(
            "root element is '{}', expected 'stylesheet'",
            root.tag_name().name()
        )));
    }
    Ok(())
}

/// [`check_stylesheet`] plus the rules of `format`.
///
/// JSON stylesheets must build exactly one top-level `xsl:map`.
pub fn check_format(format: OutputFormat, text: &str) -> Result<(), ValidationError> {
    check_stylesheet(text)?;
    if format != OutputFormat::Json {
        return Ok(());
    }

    let doc = Document::parse(text)?;
    let top_level = doc
        .descendants()
        .filter(|n| is_xsl(n, "map"))
        .filter(|n| !n.ancestors().skip(1).any(|a| is_xsl(&a, "map")))
        .count();
    if top_level != 1 {
        return Err(ValidationError::MalformedOutput(format!(
            "expected exactly one top-level xsl:map, found {}",
            top_level
        )));
    }
    Ok(())
}

fn is_xsl(node: &Node<'_, '_>, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(XSL_NAMESPACE)
}

pub fn validate(text: &str) -> ValidationReport {
    ValidationReport::from_result(check_stylesheet(text))
}

pub fn validate_format(format: OutputFormat, text: &str) -> ValidationReport {
    ValidationReport::from_result(check_format(format, text))
}
