//! Per-source collectors.
//!
//! Each collector turns one config section plus the per-source context into
//! a flat map of named values. Both share the URL templating rules here and
//! the retry policy in [`crate::http`].

pub mod api;
pub mod html;

use std::collections::HashMap;

/// Per-source key/value set used to fill URL template placeholders.
/// The runner currently supplies a single key, `external_id`.
pub type Context = HashMap<String, String>;

/// Substitute `{placeholder}` tokens from the context. No recursion, no
/// nesting; a token without a closing brace is copied verbatim. A missing
/// context key fails with the placeholder name.
pub(crate) fn fill_template(template: &str, context: &Context) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match context.get(name) {
                    Some(value) => out.push_str(value),
                    None => return Err(name.to_string()),
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
