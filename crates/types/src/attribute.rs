//! Attribute and variable specifications.
//!
//! The editor stores both as loose property bags (`value` + `isHardcoded`,
//! `value` + `isVariable`, or `xpath`). They are parsed at the boundary into
//! sum types so that exactly one value mode is ever active.

use crate::error::MappingError;
use serde::{Deserialize, Serialize};

/// How an attribute obtains its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A literal string written as-is.
    Hardcoded(String),
    /// The name of a declared [`Variable`].
    Variable(String),
    /// An XPath expression evaluated when the stylesheet runs.
    XPath(String),
}

/// A single attribute attached to an output element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAttributeSpec", into = "RawAttributeSpec")]
pub struct AttributeSpec {
    pub name: String,
    pub value: AttributeValue,
}

impl AttributeSpec {
    pub fn hardcoded(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Hardcoded(value.into()),
        }
    }

    pub fn variable(name: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Variable(variable.into()),
        }
    }

    pub fn xpath(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::XPath(expr.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttributeSpec {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_hardcoded: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_variable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xpath: Option<String>,
}

impl TryFrom<RawAttributeSpec> for AttributeSpec {
    type Error = MappingError;

    fn try_from(raw: RawAttributeSpec) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| MappingError::InvalidAttribute {
            name: raw.name.clone(),
            reason: reason.to_string(),
        };

        if raw.name.trim().is_empty() {
            return Err(invalid("attribute name is empty"));
        }

        let xpath = raw.xpath.as_deref().filter(|x| !x.trim().is_empty());
        let active = [raw.is_hardcoded, raw.is_variable, xpath.is_some()]
            .iter()
            .filter(|on| **on)
            .count();
        if active != 1 {
            return Err(invalid(
                "exactly one of isHardcoded, isVariable or xpath must be set",
            ));
        }

        let value = if let Some(expr) = xpath {
            AttributeValue::XPath(expr.to_string())
        } else if raw.is_variable {
            match raw.value.as_deref().filter(|v| !v.trim().is_empty()) {
                Some(var) => AttributeValue::Variable(var.trim().to_string()),
                None => return Err(invalid("variable attribute has no variable name")),
            }
        } else {
            AttributeValue::Hardcoded(raw.value.clone().unwrap_or_default())
        };

        Ok(AttributeSpec {
            name: raw.name.trim().to_string(),
            value,
        })
    }
}

impl From<AttributeSpec> for RawAttributeSpec {
    fn from(spec: AttributeSpec) -> Self {
        let mut raw = RawAttributeSpec {
            name: spec.name,
            ..Default::default()
        };
        match spec.value {
            AttributeValue::Hardcoded(v) => {
                raw.value = Some(v);
                raw.is_hardcoded = true;
            }
            AttributeValue::Variable(v) => {
                raw.value = Some(v);
                raw.is_variable = true;
            }
            AttributeValue::XPath(x) => raw.xpath = Some(x),
        }
        raw
    }
}

/// Value of a stylesheet-scoped variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    Literal(String),
    XPath(String),
}

/// A stylesheet-scoped constant, referenced from attributes as `$name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVariable", into = "RawVariable")]
pub struct Variable {
    pub name: String,
    pub value: VariableValue,
}

impl Variable {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: VariableValue::Literal(value.into()),
        }
    }

    pub fn xpath(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: VariableValue::XPath(expr.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawVariable {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xpath: Option<String>,
}

impl TryFrom<RawVariable> for Variable {
    type Error = MappingError;

    fn try_from(raw: RawVariable) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| MappingError::InvalidVariable {
            name: raw.name.clone(),
            reason: reason.to_string(),
        };

        if raw.name.trim().is_empty() {
            return Err(invalid("variable name is empty"));
        }
        let xpath = raw.xpath.as_deref().filter(|x| !x.trim().is_empty());
        let value = match (raw.value.as_deref(), xpath) {
            (Some(_), Some(_)) => return Err(invalid("both value and xpath are set")),
            (None, None) => return Err(invalid("neither value nor xpath is set")),
            (Some(v), None) => VariableValue::Literal(v.to_string()),
            (None, Some(x)) => VariableValue::XPath(x.to_string()),
        };

        Ok(Variable {
            name: raw.name.trim().to_string(),
            value,
        })
    }
}

impl From<Variable> for RawVariable {
    fn from(var: Variable) -> Self {
        match var.value {
            VariableValue::Literal(v) => RawVariable {
                name: var.name,
                value: Some(v),
                xpath: None,
            },
            VariableValue::XPath(x) => RawVariable {
                name: var.name,
                value: None,
                xpath: Some(x),
            },
        }
    }
}
