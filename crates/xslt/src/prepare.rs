//! First generation step: drop unusable mappings and normalize source paths.

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use xslmap_types::Mapping;
use xslmap_xpath::normalize;

#[derive(Debug, Default)]
pub struct Prepared {
    pub mappings: Vec<Mapping>,
    /// Number of mappings skipped for missing source path or target name.
    pub skipped: usize,
}

/// Validates each mapping and normalizes its source and for-each paths.
///
/// Invalid mappings are skipped and reported; path issues are reported but
/// the best-effort normalized path is kept.
pub fn prepare(fields: &[Mapping], sink: &dyn DiagnosticSink) -> Prepared {
    let mut prepared = Prepared::default();

    for (index, field) in fields.iter().enumerate() {
        if let Err(e) = field.validate() {
            sink.report(Diagnostic::warning(
                DiagnosticKind::MalformedInput,
                format!("field #{} skipped: {}", index + 1, e),
            ));
            prepared.skipped += 1;
            continue;
        }

        let mut mapping = field.clone();
        mapping.source_path = normalized(&field.source_path, sink);
        if let Some(path) = field.for_each() {
            mapping.for_each_path = Some(normalized(path, sink));
        }
        prepared.mappings.push(mapping);
    }

    log::debug!(
        "Prepared {} mapping(s), skipped {}",
        prepared.mappings.len(),
        prepared.skipped
    );
    prepared
}

fn normalized(path: &str, sink: &dyn DiagnosticSink) -> String {
    let result = normalize(path);
    for issue in result.issues {
        sink.report(Diagnostic::warning(DiagnosticKind::InvalidXPath, issue.to_string()));
    }
    result.path
}
