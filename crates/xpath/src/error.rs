use thiserror::Error;

/// Problems found while normalizing a source path.
///
/// These are advisory: normalization always produces a best-effort path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XPathError {
    #[error("Unbalanced brackets in path '{path}'")]
    UnbalancedBrackets { path: String },

    #[error("Path '{path}' starts with invalid character '{found}'")]
    InvalidLeadingCharacter { path: String, found: char },
}
