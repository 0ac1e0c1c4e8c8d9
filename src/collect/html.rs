//! HTML collector: fetch a page and pull named values out of the parsed
//! document with first-match CSS selectors.

use indexmap::IndexMap;
use scraper::Html;
use serde_json::Value;

use super::{fill_template, Context};
use crate::config::HtmlSpec;
use crate::error::{CollectError, CollectorKind};
use crate::extract::css;
use crate::http::{HttpTransport, RequestSpec, RetryPolicy};

/// Collect one flat value map from the configured page.
///
/// Always a GET; same templating and retry semantics as the API collector.
/// HTML parsing is lenient and never fails — selector misses are null.
pub fn collect(
    spec: &HtmlSpec,
    context: &Context,
    policy: &RetryPolicy,
    transport: &dyn HttpTransport,
) -> Result<IndexMap<String, Value>, CollectError> {
    if !spec.enabled {
        return Ok(IndexMap::new());
    }

    let url = fill_template(spec.url.as_deref().unwrap_or(""), context).map_err(|placeholder| {
        CollectError::Template {
            kind: CollectorKind::Html,
            placeholder,
        }
    })?;

    let request = RequestSpec::get(url);
    let response = policy.execute(transport, &request, CollectorKind::Html)?;
    let document = Html::parse_document(&response.body);

    Ok(spec
        .selectors
        .iter()
        .map(|(field, expr)| {
            let value = css::extract_selector(&document, expr)
                .map(Value::String)
                .unwrap_or(Value::Null);
            (field.clone(), value)
        })
        .collect())
}
