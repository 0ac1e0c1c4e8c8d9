//! API collector: fetch a JSON endpoint and pull named values out of the
//! response body by dot-path.

use indexmap::IndexMap;
use serde_json::Value;

use super::{fill_template, Context};
use crate::config::ApiSpec;
use crate::error::{CollectError, CollectorKind};
use crate::extract::json_path;
use crate::http::{HttpTransport, RequestSpec, RetryPolicy};

/// Collect one flat value map from the configured API.
///
/// A disabled section yields an empty map without touching the network.
/// Every `json_key_map` entry always appears in the output; unresolvable
/// paths are null.
pub fn collect(
    spec: &ApiSpec,
    context: &Context,
    policy: &RetryPolicy,
    transport: &dyn HttpTransport,
) -> Result<IndexMap<String, Value>, CollectError> {
    if !spec.enabled {
        return Ok(IndexMap::new());
    }

    let url = fill_template(spec.base_url.as_deref().unwrap_or(""), context).map_err(
        |placeholder| CollectError::Template {
            kind: CollectorKind::Api,
            placeholder,
        },
    )?;

    let request = RequestSpec {
        method: spec.method.clone(),
        url,
        params: spec
            .params
            .iter()
            .map(|(name, value)| (name.clone(), render_param(value)))
            .collect(),
        headers: spec
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    };

    let response = policy.execute(transport, &request, CollectorKind::Api)?;

    let payload: Value =
        serde_json::from_str(&response.body).map_err(|err| CollectError::Parse {
            kind: CollectorKind::Api,
            url: request.url.clone(),
            reason: err.to_string(),
        })?;

    Ok(spec
        .json_key_map
        .iter()
        .map(|(field, path)| (field.clone(), json_path::extract(&payload, path)))
        .collect())
}

// Strings go on the wire as-is; other scalars via their JSON rendering.
fn render_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
