//! Per-field value formatting shared by all emitters.
//!
//! The policy only decides *what* happens to a value; each emitter renders it
//! in its own syntax.

use xslmap_types::{FieldType, Mapping};

/// XPath expression for the processor's current date-time as `YYYY-MM-DDTHH:MM:SS`.
///
/// `current-dateTime()` is an XPath 2.0 function, so this fallback only
/// evaluates under an XSLT 2.0 or later processor even when the stylesheet
/// declares `version="1.0"`.
pub const CURRENT_DATE_TIME: &str = "substring(string(current-dateTime()), 1, 19)";

/// Currency code attached to currency fields in XML output.
pub const DEFAULT_CURRENCY: &str = "USD";

pub const CURRENCY_ATTRIBUTE: &str = "currencyID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// The value when present, otherwise the current date-time.
    DateWithFallback,
    /// Exactly two decimal places.
    TwoDecimals { currency: bool },
    /// The value as-is, without a presence check.
    Raw,
    /// The value when present; a missing value is annotated instead.
    Text,
}

impl ValueFormat {
    pub fn for_field(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Date | FieldType::DateTime => ValueFormat::DateWithFallback,
            FieldType::Currency => ValueFormat::TwoDecimals { currency: true },
            FieldType::Decimal | FieldType::Numeric => ValueFormat::TwoDecimals { currency: false },
            FieldType::Time => ValueFormat::Raw,
            FieldType::String | FieldType::Component => ValueFormat::Text,
        }
    }
}

/// `format-number(<select>,'0.00')`
pub fn two_decimals(select: &str) -> String {
    format!("format-number({},'0.00')", select)
}

/// The annotation written when a text value is absent.
pub fn missing_note(mapping: &Mapping) -> String {
    if mapping.required {
        format!("required field '{}' has no value", mapping.target_name)
    } else {
        format!("optional field '{}' not present", mapping.target_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_per_field_type() {
        assert_eq!(ValueFormat::for_field(FieldType::DateTime), ValueFormat::DateWithFallback);
        assert_eq!(
            ValueFormat::for_field(FieldType::Currency),
            ValueFormat::TwoDecimals { currency: true }
        );
        assert_eq!(
            ValueFormat::for_field(FieldType::Numeric),
            ValueFormat::TwoDecimals { currency: false }
        );
        assert_eq!(ValueFormat::for_field(FieldType::Time), ValueFormat::Raw);
        assert_eq!(ValueFormat::for_field(FieldType::String), ValueFormat::Text);
    }

    #[test]
    fn test_two_decimals() {
        assert_eq!(two_decimals("Amount"), "format-number(Amount,'0.00')");
    }

    #[test]
    fn test_missing_note() {
        let required = Mapping::new("a", "Name").unwrap();
        assert!(missing_note(&required).starts_with("required"));
        assert!(missing_note(&required.optional()).starts_with("optional"));
    }
}
