//! Canonicalization of raw source paths.

use crate::error::XPathError;
use crate::steps::brackets_balanced;

/// The outcome of normalizing one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub path: String,
    /// Advisory problems. The path is still usable.
    pub issues: Vec<XPathError>,
}

/// Normalizes a raw path and collects any validation issues.
///
/// In order: a leading `<file>.xml/` segment is dropped, `.` used as a
/// hierarchy separator becomes `/` (never inside a predicate), and paths not
/// starting with `/` or `*` are turned into descendant searches with `//`.
pub fn normalize(raw: &str) -> Normalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Normalized::default();
    }

    let cleaned = replace_separator_dots(strip_file_prefix(trimmed));
    let issues = validate(&cleaned);

    let path = if cleaned.starts_with('/') || cleaned.starts_with('*') {
        cleaned
    } else {
        format!("//{}", cleaned)
    };

    if path != raw {
        log::trace!("Normalized source path '{}' -> '{}'", raw, path);
    }
    Normalized { path, issues }
}

/// Normalizes a path, discarding validation issues.
pub fn normalize_path(raw: &str) -> String {
    normalize(raw).path
}

fn strip_file_prefix(path: &str) -> &str {
    let Some(idx) = path.find('/') else {
        return path;
    };
    let head = &path[..idx];
    let is_file = head.len() > ".xml".len()
        && head.to_ascii_lowercase().ends_with(".xml")
        && !head.contains(['[', '@', '*']);
    if is_file { &path[idx + 1..] } else { path }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | ']')
}

fn is_step_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '@' | '*')
}

fn replace_separator_dots(path: &str) -> String {
    let chars: Vec<char> = path.chars().collect();
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                let after_name = i > 0 && is_name_char(chars[i - 1]);
                let before_step = chars.get(i + 1).is_some_and(|&n| is_step_start(n));
                if after_name && before_step {
                    out.push('/');
                    continue;
                }
            }
            _ => {}
        }
        out.push(c);
    }
    out
}

fn validate(path: &str) -> Vec<XPathError> {
    let mut issues = Vec::new();
    if !brackets_balanced(path) {
        issues.push(XPathError::UnbalancedBrackets {
            path: path.to_string(),
        });
    }
    if let Some(first) = path.chars().next() {
        if !(first.is_alphabetic() || matches!(first, '/' | '*' | '@')) {
            issues.push(XPathError::InvalidLeadingCharacter {
                path: path.to_string(),
                found: first,
            });
        }
    }
    issues
}
