//! XSLT 1.0 stylesheet writing one delimited text row per record.

use super::{EmitInput, StylesheetEmitter, close_stylesheet, open_stylesheet};
use crate::error::GenerateError;
use crate::policy::{CURRENT_DATE_TIME, ValueFormat, two_decimals};
use crate::writer::{StylesheetWriter, escape_attr, escape_text};
use std::fmt;
use xslmap_types::{FieldType, Mapping, ValueType};
use xslmap_xpath::{normalize_path, relative_to, with_position};

const DEFAULT_RECORD: &str = "*";
const DEFAULT_ROOT: &str = "/*";

pub struct FlatEmitter;

impl StylesheetEmitter for FlatEmitter {
    fn emit(&self, input: &EmitInput<'_>) -> Result<String, GenerateError> {
        // Components carry no value of their own.
        let columns: Vec<&Mapping> = input
            .mappings
            .iter()
            .filter(|m| !m.is_placeholder && m.field_type != FieldType::Component)
            .collect();

        let root = input
            .set
            .root_path()
            .map(normalize_path)
            .unwrap_or_else(|| DEFAULT_ROOT.to_string());
        let record = input.set.record_path().unwrap_or(DEFAULT_RECORD);
        let context = if record == DEFAULT_RECORD {
            root.as_str()
        } else {
            record
        };
        let delimiter = &input.options.delimiter;
        log::debug!(
            "Emitting flat stylesheet: {} column source(s), records '{}' under '{}'",
            columns.len(),
            record,
            root
        );

        let mut w = StylesheetWriter::new(input.options.indent);
        open_stylesheet(
            &mut w,
            input.set.xslt_version_or("1.0"),
            &input.options.namespaces,
            &[],
        )?;
        w.line(r#"<xsl:output method="text" encoding="UTF-8"/>"#)?;

        w.open(r#"<xsl:template match="/">"#)?;
        let header = header_row(&columns, delimiter);
        w.line(&format!("<xsl:text>{}</xsl:text>", escape_text(&header)))?;
        w.line(&format!(
            r#"<xsl:apply-templates select="{}"/>"#,
            escape_attr(&root)
        ))?;
        w.close("</xsl:template>")?;

        w.open(&format!(r#"<xsl:template match="{}">"#, escape_attr(record)))?;
        let separator = format!("<xsl:text>{}</xsl:text>", escape_text(delimiter));
        for (index, mapping) in columns.iter().enumerate() {
            let last_column = index + 1 == columns.len();
            let occurs = mapping.occurrences();
            w.comment(&column_note(mapping))?;
            for position in 1..=occurs {
                write_block(&mut w, mapping, context, (occurs > 1).then_some(position))?;
                if last_column && position == occurs {
                    w.line("<xsl:text>&#10;</xsl:text>")?;
                } else {
                    w.line(&separator)?;
                }
            }
        }
        w.close("</xsl:template>")?;

        w.line(r#"<xsl:template match="text()"/>"#)?;
        close_stylesheet(&mut w)?;
        Ok(w.finish())
    }
}

/// Column names joined by `delimiter`, terminated by a newline.
pub fn header_row(columns: &[&Mapping], delimiter: &str) -> String {
    let mut names = Vec::new();
    for mapping in columns {
        let base = mapping.effective_target_path().replace('/', ".");
        match mapping.occurrences() {
            1 => names.push(base),
            n => names.extend((1..=n).map(|i| format!("{}_{}", base, i))),
        }
    }
    let mut row = names.join(delimiter);
    row.push('\n');
    row
}

fn column_note(mapping: &Mapping) -> String {
    let presence = if mapping.required {
        "required"
    } else {
        "optional"
    };
    match mapping.occurrences() {
        1 => format!("{} ({})", mapping.effective_target_path(), presence),
        n => format!(
            "{} ({}, {} occurrences)",
            mapping.effective_target_path(),
            presence,
            n
        ),
    }
}

/// Path of a field relative to the record context node. Paths outside the
/// record are read through their full path.
fn record_select(mapping: &Mapping, context: &str, position: Option<u32>) -> String {
    let path = relative_to(&mapping.source_path, context)
        .unwrap_or_else(|| mapping.source_path.clone());
    match position {
        Some(i) => with_position(&path, i),
        None => path,
    }
}

fn write_block(
    w: &mut StylesheetWriter,
    mapping: &Mapping,
    context: &str,
    position: Option<u32>,
) -> fmt::Result {
    match mapping.value_type {
        ValueType::Empty => return Ok(()),
        ValueType::Hardcoded => {
            let text = mapping.hardcoded_value.as_deref().unwrap_or_default();
            if text.is_empty() {
                return Ok(());
            }
            return w.line(&format!("<xsl:text>{}</xsl:text>", escape_text(text)));
        }
        ValueType::Xpath => {}
    }

    let select = record_select(mapping, context, position);
    let sel = escape_attr(&select);
    match ValueFormat::for_field(mapping.field_type) {
        ValueFormat::DateWithFallback => {
            w.open("<xsl:choose>")?;
            w.line(&format!(
                r#"<xsl:when test="{0}"><xsl:value-of select="{0}"/></xsl:when>"#,
                sel
            ))?;
            w.line(&format!(
                r#"<xsl:otherwise><xsl:value-of select="{}"/></xsl:otherwise>"#,
                CURRENT_DATE_TIME
            ))?;
            w.close("</xsl:choose>")
        }
        ValueFormat::TwoDecimals { .. } => w.line(&format!(
            r#"<xsl:value-of select="{}"/>"#,
            escape_attr(&two_decimals(&select))
        )),
        ValueFormat::Raw | ValueFormat::Text => {
            w.line(&format!(r#"<xsl:value-of select="{}"/>"#, sel))
        }
    }
}
