use crate::steps::split_steps;

/// A source path split into the node it selects and the path leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePath {
    Attribute {
        parent_path: String,
        attribute_name: String,
    },
    Element {
        parent_path: String,
        element_name: String,
        /// The path exactly as it was given.
        xpath: String,
    },
}

impl SourcePath {
    pub fn is_attribute(&self) -> bool {
        matches!(self, SourcePath::Attribute { .. })
    }

    /// Local name of the selected element or attribute.
    pub fn name(&self) -> &str {
        match self {
            SourcePath::Attribute { attribute_name, .. } => attribute_name,
            SourcePath::Element { element_name, .. } => element_name,
        }
    }

    pub fn parent_path(&self) -> &str {
        match self {
            SourcePath::Attribute { parent_path, .. } | SourcePath::Element { parent_path, .. } => {
                parent_path
            }
        }
    }

    /// The reference used to read the value: `@name` for attributes, the full
    /// path for elements.
    pub fn value_ref(&self) -> String {
        match self {
            SourcePath::Attribute { attribute_name, .. } => format!("@{}", attribute_name),
            SourcePath::Element { xpath, .. } => xpath.clone(),
        }
    }
}

/// Splits a normalized (or raw) source path into its element or attribute parts.
///
/// Anything containing `/@` is an attribute reference, split at the last
/// occurrence. Everything else is an element path whose last step is the
/// element name.
pub fn parse_source_path(path: &str) -> SourcePath {
    if let Some(idx) = path.rfind("/@") {
        return SourcePath::Attribute {
            parent_path: path[..idx].to_string(),
            attribute_name: path[idx + 2..].to_string(),
        };
    }
    if let Some(name) = path.strip_prefix('@') {
        return SourcePath::Attribute {
            parent_path: String::new(),
            attribute_name: name.to_string(),
        };
    }

    let mut steps = split_steps(path);
    let element_name = steps.pop().unwrap_or_default().to_string();
    SourcePath::Element {
        parent_path: steps.join("/"),
        element_name,
        xpath: path.to_string(),
    }
}
