use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Unsupported output format '{0}' (expected xml, json, flat or csv)")]
    UnsupportedFormat(String),

    #[error("Failed to write stylesheet: {0}")]
    Emit(#[from] std::fmt::Error),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Malformed stylesheet: {0}")]
    MalformedOutput(String),
}
