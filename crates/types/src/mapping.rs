//! Mapping rows and the top-level mapping set.

use crate::attribute::{AttributeSpec, Variable};
use crate::error::MappingError;
use serde::{Deserialize, Serialize};

/// Whether a source path points at an element or an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Element,
    Attribute,
}

/// Formatting class of a mapped field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Date,
    DateTime,
    Time,
    Currency,
    Numeric,
    Decimal,
    /// A container with no value of its own.
    Component,
    /// Unknown type names fall back to plain strings.
    #[default]
    #[serde(other)]
    String,
}

/// Where the value of a field comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Xpath,
    Hardcoded,
    Empty,
}

fn default_occurs() -> u32 {
    1
}

fn default_required() -> bool {
    true
}

fn is_one(n: &u32) -> bool {
    *n == 1
}

fn is_true(b: &bool) -> bool {
    *b
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One source-path-to-target-path binding plus rendering metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    #[serde(default)]
    pub source_path: String,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub target_name: String,
    /// Slash-delimited output path. Falls back to `target_name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default = "default_occurs", skip_serializing_if = "is_one")]
    pub occurs: u32,
    #[serde(default = "default_required", skip_serializing_if = "is_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardcoded_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_each_path: Option<String>,
    /// Set on containers synthesized to fill gaps in the target hierarchy.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_placeholder: bool,
}

impl Mapping {
    /// Creates a mapping, rejecting empty source paths and target names.
    pub fn new(
        source_path: impl Into<String>,
        target_name: impl Into<String>,
    ) -> Result<Self, MappingError> {
        let mapping = Self {
            source_path: source_path.into(),
            source_type: SourceType::Element,
            target_name: target_name.into(),
            target_path: None,
            field_type: FieldType::String,
            occurs: 1,
            required: true,
            attributes: Vec::new(),
            value_type: ValueType::Xpath,
            hardcoded_value: None,
            for_each_path: None,
            is_placeholder: false,
        };
        mapping.validate()?;
        Ok(mapping)
    }

    /// A synthesized container for a target path prefix nobody mapped explicitly.
    pub fn placeholder(prefix: &str) -> Self {
        let name = prefix.rsplit('/').next().unwrap_or(prefix);
        Self {
            source_path: format!("//{}", prefix.replace('/', "_")),
            source_type: SourceType::Element,
            target_name: name.to_string(),
            target_path: Some(prefix.to_string()),
            field_type: FieldType::Component,
            occurs: 1,
            required: false,
            attributes: Vec::new(),
            value_type: ValueType::Xpath,
            hardcoded_value: None,
            for_each_path: None,
            is_placeholder: true,
        }
    }

    pub fn validate(&self) -> Result<(), MappingError> {
        if self.source_path.trim().is_empty() {
            return Err(MappingError::MalformedInput {
                reason: format!("mapping '{}' has no source path", self.target_name),
            });
        }
        if self.target_name.trim().is_empty() {
            return Err(MappingError::MalformedInput {
                reason: format!("mapping for '{}' has no target name", self.source_path),
            });
        }
        Ok(())
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn with_target_path(mut self, path: impl Into<String>) -> Self {
        self.target_path = Some(path.into());
        self
    }

    pub fn with_field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn with_occurs(mut self, occurs: u32) -> Self {
        self.occurs = occurs;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_hardcoded_value(mut self, value: impl Into<String>) -> Self {
        self.value_type = ValueType::Hardcoded;
        self.hardcoded_value = Some(value.into());
        self
    }

    pub fn with_empty_value(mut self) -> Self {
        self.value_type = ValueType::Empty;
        self
    }

    pub fn with_for_each(mut self, path: impl Into<String>) -> Self {
        self.for_each_path = Some(path.into());
        self
    }

    /// The slash-delimited output path, trimmed of stray slashes.
    pub fn effective_target_path(&self) -> &str {
        self.target_path
            .as_deref()
            .map(|p| p.trim().trim_matches('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(self.target_name.trim())
    }

    /// The declared repetition count, never less than one.
    pub fn occurrences(&self) -> u32 {
        self.occurs.max(1)
    }

    /// The explicit repetition source, if one is set.
    pub fn for_each(&self) -> Option<&str> {
        self.for_each_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// True when the field triggers loop generation.
    pub fn repeats(&self) -> bool {
        self.occurrences() > 1 || self.for_each().is_some()
    }
}

/// The root element of the XML output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootElement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
}

impl RootElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Top-level compiler input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSet {
    #[serde(default)]
    pub fields: Vec<Mapping>,
    /// Iteration anchor (Flat and JSON output).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    /// Per-row element (Flat output).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_element: Option<RootElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xslt_version: Option<String>,
}

impl MappingSet {
    pub fn new(fields: Vec<Mapping>) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn with_root_path(mut self, path: impl Into<String>) -> Self {
        self.root_path = Some(path.into());
        self
    }

    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    pub fn with_root_element(mut self, root: RootElement) -> Self {
        self.root_element = Some(root);
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_xslt_version(mut self, version: impl Into<String>) -> Self {
        self.xslt_version = Some(version.into());
        self
    }

    pub fn root_path(&self) -> Option<&str> {
        non_blank(self.root_path.as_deref())
    }

    pub fn record_path(&self) -> Option<&str> {
        non_blank(self.record_path.as_deref())
    }

    /// The configured XSLT version, or `default` when none is set.
    pub fn xslt_version_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_blank(self.xslt_version.as_deref()).unwrap_or(default)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
