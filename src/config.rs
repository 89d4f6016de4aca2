//! Project files: a mapping set plus the options to generate it with.
//!
//! ```json
//! {
//!   "format": "flat",
//!   "delimiter": ";",
//!   "namespaces": { "hr": "urn:example:hr" },
//!   "jsonValues": "direct",
//!   "mappingSet": { "fields": [ ... ] }
//! }
//! ```

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use xslmap_types::{MappingSet, Namespaces};
use xslmap_xslt::{GenerateError, GenerateOptions, JsonValueMode, OutputFormat};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Output format name; kept as text so an unknown name is reported as such.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub namespaces: Namespaces,
    #[serde(default)]
    pub json_values: JsonValueMode,
    pub mapping_set: MappingSet,
}

impl ProjectConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads and parses a project file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::info!(
            "Loaded project {} with {} field(s)",
            path.display(),
            config.mapping_set.fields.len()
        );
        Ok(config)
    }

    /// The output format: `requested` if given, else the file's, else XML.
    pub fn format(&self, requested: Option<&str>) -> Result<OutputFormat, GenerateError> {
        match requested.or(self.format.as_deref()) {
            Some(name) => name.parse(),
            None => Ok(OutputFormat::Xml),
        }
    }

    /// Generation options from the file, with `delimiter` overriding the file's.
    pub fn options(&self, delimiter: Option<&str>) -> GenerateOptions {
        let mut options = GenerateOptions::default()
            .with_namespaces(self.namespaces.clone())
            .with_json_values(self.json_values);
        if let Some(d) = delimiter.or(self.delimiter.as_deref()) {
            options = options.with_delimiter(d);
        }
        options
    }
}
