use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink, Tee};
use crate::emitters::{EmitInput, FlatEmitter, JsonEmitter, StylesheetEmitter, XmlEmitter};
use crate::error::GenerateError;
use crate::hierarchy::complete;
use crate::prepare::prepare;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use xslmap_types::{MappingSet, Namespaces};

/// The shape of the document a generated stylesheet produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// XSLT 1.0, hierarchical XML result.
    Xml,
    /// XSLT 3.0, one JSON object built from `xsl:map`.
    Json,
    /// XSLT 1.0, delimited text with a header row. Also accepted as `csv`.
    #[serde(alias = "csv")]
    Flat,
}

impl OutputFormat {
    fn emitter(self) -> &'static dyn StylesheetEmitter {
        match self {
            OutputFormat::Xml => &XmlEmitter,
            OutputFormat::Json => &JsonEmitter,
            OutputFormat::Flat => &FlatEmitter,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(OutputFormat::Xml),
            "json" => Ok(OutputFormat::Json),
            "flat" | "csv" => Ok(OutputFormat::Flat),
            _ => Err(GenerateError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
            OutputFormat::Flat => "flat",
        })
    }
}

/// How JSON leaf values are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonValueMode {
    /// Plain `xsl:value-of`; every leaf is a string.
    #[default]
    Direct,
    /// Field-type aware expressions: numbers, date fallbacks and nulls for missing text.
    Typed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub namespaces: Namespaces,
    /// Column separator for flat output.
    pub delimiter: String,
    pub json_values: JsonValueMode,
    /// Spaces per nesting level in the generated stylesheet.
    pub indent: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            namespaces: Namespaces::default(),
            delimiter: ",".to_string(),
            json_values: JsonValueMode::Direct,
            indent: 2,
        }
    }
}

impl GenerateOptions {
    pub fn with_namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_json_values(mut self, mode: JsonValueMode) -> Self {
        self.json_values = mode;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// A stylesheet together with everything reported while producing it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub format: OutputFormat,
    pub stylesheet: String,
    /// Mappings dropped for a missing source path or target name.
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

static LOG_SINK: LogSink = LogSink;

/// Compiles mapping sets into stylesheets.
///
/// A generator holds no state between runs and can be shared across threads;
/// the same input always yields the same text.
pub struct Generator<'s> {
    options: GenerateOptions,
    sink: &'s dyn DiagnosticSink,
}

impl Generator<'static> {
    /// A generator reporting diagnostics through the `log` facade.
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            sink: &LOG_SINK,
        }
    }
}

impl<'s> Generator<'s> {
    pub fn with_sink(options: GenerateOptions, sink: &'s dyn DiagnosticSink) -> Self {
        Self { options, sink }
    }

    pub fn generate(&self, format: OutputFormat, set: &MappingSet) -> Result<String, GenerateError> {
        self.run(format, set, self.sink).map(|(stylesheet, _)| stylesheet)
    }

    /// Like [`Generator::generate`], also returning the diagnostics and skip count.
    pub fn generate_report(
        &self,
        format: OutputFormat,
        set: &MappingSet,
    ) -> Result<GenerationReport, GenerateError> {
        let tee = Tee {
            collected: Default::default(),
            next: self.sink,
        };
        let (stylesheet, skipped) = self.run(format, set, &tee)?;
        Ok(GenerationReport {
            format,
            stylesheet,
            skipped,
            diagnostics: tee.collected.into_diagnostics(),
        })
    }

    fn run(
        &self,
        format: OutputFormat,
        set: &MappingSet,
        sink: &dyn DiagnosticSink,
    ) -> Result<(String, usize), GenerateError> {
        log::debug!(
            "Generating {} stylesheet from {} field(s)",
            format,
            set.fields.len()
        );
        let prepared = prepare(&set.fields, sink);
        let mappings = complete(&prepared.mappings);
        let input = EmitInput {
            set,
            mappings: &mappings,
            options: &self.options,
            sink,
        };
        let stylesheet = format.emitter().emit(&input)?;
        log::trace!("Generated {} bytes of {} stylesheet", stylesheet.len(), format);
        Ok((stylesheet, prepared.skipped))
    }
}

/// Parses `format` and generates a stylesheet, logging diagnostics.
///
/// Fails with [`GenerateError::UnsupportedFormat`] before any work is done
/// when `format` is not one of `xml`, `json`, `flat` or `csv`.
pub fn generate(
    format: &str,
    set: &MappingSet,
    options: &GenerateOptions,
) -> Result<String, GenerateError> {
    let format: OutputFormat = format.parse()?;
    Generator::new(options.clone()).generate(format, set)
}
