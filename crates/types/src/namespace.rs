use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace table mapping prefixes to URIs.
///
/// The reserved key `default` holds the unprefixed namespace. Entries are kept
/// sorted by prefix so that generated declarations are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespaces(BTreeMap<String, String>);

impl Namespaces {
    pub const DEFAULT_KEY: &'static str = "default";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(prefix, uri);
        self
    }

    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.0.insert(prefix.into(), uri.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The URI of the unprefixed namespace, if declared.
    pub fn default_uri(&self) -> Option<&str> {
        self.0.get(Self::DEFAULT_KEY).map(String::as_str)
    }

    /// Every `(prefix, uri)` pair except the default namespace.
    pub fn prefixed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(prefix, _)| prefix.as_str() != Self::DEFAULT_KEY)
            .map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Namespaces {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_separated_from_prefixes() {
        let ns = Namespaces::new()
            .with("default", "urn:out")
            .with("hr", "urn:hr")
            .with("acc", "urn:acc");

        assert_eq!(ns.default_uri(), Some("urn:out"));
        let prefixes: Vec<_> = ns.prefixed().map(|(p, _)| p).collect();
        assert_eq!(prefixes, vec!["acc", "hr"]);
    }
}
