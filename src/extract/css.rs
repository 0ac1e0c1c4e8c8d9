//! CSS selector-based extraction
//!
//! Uses the scraper crate to evaluate a selector expression against a parsed
//! document and pull out one value: the first matching element's trimmed text,
//! or one of its attributes when the expression carries a `::attr(name)`
//! suffix.

use scraper::{Html, Selector};

/// Split a selector expression into the base selector and an optional
/// attribute name. The suffix is literal: `img.hero::attr(src)` selects
/// `img.hero` and reads its `src` attribute. Only recognized when the
/// expression ends with `)`.
pub fn split_attr_suffix(expr: &str) -> (&str, Option<&str>) {
    if let Some(pos) = expr.find("::attr(") {
        if expr.ends_with(')') {
            let attr = &expr[pos + "::attr(".len()..expr.len() - 1];
            return (&expr[..pos], Some(attr));
        }
    }
    (expr, None)
}

/// Evaluate a selector expression and return the extracted value.
///
/// First match wins. With an attribute suffix the value is that attribute
/// (trimmed), or a miss when the attribute is absent. Without one, the value
/// is the element's text content with leading/trailing whitespace stripped.
/// An unparseable selector is a miss, never an error.
pub fn extract_selector(document: &Html, expr: &str) -> Option<String> {
    let (base, attr) = split_attr_suffix(expr);
    let selector = Selector::parse(base).ok()?;
    let element = document.select(&selector).next()?;

    match attr {
        Some(name) => element.value().attr(name).map(|v| v.trim().to_string()),
        None => Some(element.text().collect::<String>().trim().to_string()),
    }
}
