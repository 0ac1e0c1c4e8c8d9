//! Value extraction: dot-path navigation over JSON and first-match CSS
//! selector evaluation over HTML. Both are pure and never fail — anything
//! that cannot be resolved is a miss, surfaced as null downstream.

pub mod css;
pub mod json_path;

pub use css::{extract_selector, split_attr_suffix};
pub use json_path::{extract, extract_path};
