use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Malformed mapping: {reason}")]
    MalformedInput { reason: String },

    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("Invalid variable '{name}': {reason}")]
    InvalidVariable { name: String, reason: String },
}
