//! Text output for generated stylesheets.
//!
//! All three emitters build their stylesheet as indented text through
//! [`StylesheetWriter`]. Every piece of user-supplied text passes through one
//! of the escaping helpers below before it is written.

use quick_xml::escape::partial_escape;
use std::borrow::Cow;
use std::fmt::{self, Write};

pub const XSL_NAMESPACE: &str = "http://www.w3.org/1999/XSL/Transform";

/// Line-oriented writer that tracks the current nesting depth.
#[derive(Debug)]
pub struct StylesheetWriter {
    out: String,
    depth: usize,
    indent: usize,
}

impl StylesheetWriter {
    pub fn new(indent: usize) -> Self {
        Self {
            out: String::with_capacity(4096),
            depth: 0,
            indent,
        }
    }

    /// Writes one line at the current depth.
    pub fn line(&mut self, text: &str) -> fmt::Result {
        write!(self.out, "{:width$}{}", "", text, width = self.depth * self.indent)?;
        self.out.write_char('\n')
    }

    /// Writes an opening tag and increases the depth.
    pub fn open(&mut self, tag: &str) -> fmt::Result {
        self.line(tag)?;
        self.depth += 1;
        Ok(())
    }

    /// Decreases the depth and writes a closing tag.
    pub fn close(&mut self, tag: &str) -> fmt::Result {
        self.depth = self.depth.saturating_sub(1);
        self.line(tag)
    }

    /// Writes a stylesheet comment (not part of the transformation result).
    pub fn comment(&mut self, text: &str) -> fmt::Result {
        self.line(&format!("<!-- {} -->", comment_text(text)))
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn char_refs(text: Cow<'_, str>) -> Cow<'_, str> {
    if !text.contains(['\n', '\r', '\t']) {
        return text;
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escapes character data. Line breaks and tabs become character references
/// so they survive whitespace handling in `xsl:text`.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    char_refs(partial_escape(text))
}

/// Escapes a value for a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let escaped = escape_text(value);
    if escaped.contains('"') {
        escaped.replace('"', "&quot;")
    } else {
        escaped.into_owned()
    }
}

/// Escapes a literal for an attribute value template, where braces are special.
pub fn escape_avt_literal(value: &str) -> String {
    escape_attr(value).replace('{', "{{").replace('}', "}}")
}

/// Quotes a string as an XPath literal. The result still needs attribute escaping.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Turns an arbitrary label into a usable element name.
///
/// Characters outside the XML name production are replaced by `_`, and a name
/// that does not start with a letter or `_` gets a `_` prefix.
pub fn element_name(label: &str) -> String {
    let mut name: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let valid_start = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !valid_start {
        name.insert(0, '_');
    }
    name
}

/// The name under which a variable is declared and referenced.
///
/// Uses the same rules as [`element_name`], so a declaration and every
/// `$name` reference to it always agree.
pub fn variable_name(label: &str) -> String {
    element_name(label)
}

/// Makes text safe for use inside `<!-- -->`.
pub fn comment_text(text: &str) -> String {
    let mut safe = text.replace("--", "- -");
    while safe.ends_with('-') {
        safe.pop();
    }
    safe
}
