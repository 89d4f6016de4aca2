pub mod fixtures;

use xslmap::{
    CollectingSink, GenerateError, GenerateOptions, GenerationReport, Generator, MappingSet,
    OutputFormat,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Generate a stylesheet with default options
pub fn stylesheet(format: OutputFormat, set: &MappingSet) -> Result<String, GenerateError> {
    Ok(report(format, set, GenerateOptions::default())?.stylesheet)
}

/// Generate a stylesheet and collect the diagnostics reported along the way
pub fn report(
    format: OutputFormat,
    set: &MappingSet,
    options: GenerateOptions,
) -> Result<GenerationReport, GenerateError> {
    let sink = CollectingSink::new();
    Generator::with_sink(options, &sink).generate_report(format, set)
}

/// Byte offset of `needle`, failing the test with the full text when absent
pub fn position(text: &str, needle: &str) -> usize {
    match text.find(needle) {
        Some(pos) => pos,
        None => panic!("expected {:?} in:\n{}", needle, text),
    }
}

/// Assert that a stylesheet contains a fragment, printing the stylesheet otherwise
#[macro_export]
macro_rules! assert_contains {
    ($text:expr, $needle:expr) => {
        assert!(
            $text.contains($needle),
            "expected {:?} in:\n{}",
            $needle,
            $text
        )
    };
}

/// Assert that fragments appear in the given order
#[macro_export]
macro_rules! assert_in_order {
    ($text:expr, $($needle:expr),+ $(,)?) => {{
        let positions = vec![$($crate::common::position(&$text, $needle)),+];
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "fragments out of order ({:?}) in:\n{}",
            positions,
            $text
        );
    }};
}
