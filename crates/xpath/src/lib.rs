//! Handling of the XPath-like source paths users bind fields to.
//!
//! Paths arrive in whatever shape the editor produced (`data.xml/Company.Employee`,
//! `Company/Employee/@id`, ...). [`normalize`] turns them into location paths a
//! stylesheet processor accepts, [`parse_source_path`] splits them into their
//! element or attribute parts, and [`relative_to`] rewrites them against the
//! context node of an enclosing loop.

pub mod error;
pub mod normalize;
pub mod relative;
pub mod source;
pub mod steps;

pub use error::XPathError;
pub use normalize::{Normalized, normalize, normalize_path};
pub use relative::{relative_to, with_position};
pub use source::{SourcePath, parse_source_path};
pub use steps::{brackets_balanced, split_steps, step_name};
