//! Source configuration: YAML loading, environment-variable expansion, and
//! load-time validation.
//!
//! A config file is a list of sources. Each source names an id, optional
//! `api` and `html` sections describing what to fetch, and a required
//! `mapping` section describing the unified record to build. Everything is
//! a plain immutable value struct; the runtime never mutates config.

use std::env;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// One configured collection target.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub id: String,
    #[serde(default)]
    pub api: Option<ApiSpec>,
    #[serde(default)]
    pub html: Option<HtmlSpec>,
    pub mapping: MappingSpec,
}

/// JSON API side of a source.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSpec {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_method")]
    pub method: String,
    /// Query parameters; scalars of any YAML type are accepted and rendered
    /// as strings at request time.
    #[serde(default)]
    pub params: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// output field name -> dot-path into the JSON response body
    #[serde(default)]
    pub json_key_map: IndexMap<String, String>,
}

/// HTML page side of a source.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlSpec {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
    /// output field name -> CSS selector, optionally `::attr(name)` suffixed
    #[serde(default)]
    pub selectors: IndexMap<String, String>,
}

/// How collector outputs merge into one unified record.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingSpec {
    /// unified field name -> `api.<key>` or `html.<key>` expression,
    /// in output column order
    pub unified_fields: IndexMap<String, String>,
    #[serde(default)]
    pub field_types: IndexMap<String, FieldType>,
}

/// Optional coercion applied after mapping resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Float,
}

fn default_enabled() -> bool {
    true
}

fn default_method() -> String {
    "GET".to_string()
}

/// Load, expand, and validate the source list from a YAML file.
pub fn load_sources(path: &Path) -> Result<Vec<SourceSpec>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sources(&raw)
}

/// Parse a YAML document holding the source list.
pub fn parse_sources(raw: &str) -> Result<Vec<SourceSpec>, ConfigError> {
    let value: serde_yaml::Value = serde_yaml::from_str(raw)?;
    if !value.is_sequence() {
        return Err(ConfigError::Invalid(
            "configuration must contain a list of sources".to_string(),
        ));
    }
    let sources: Vec<SourceSpec> = serde_yaml::from_value(expand_env(value))?;
    for source in &sources {
        validate_source(source)?;
    }
    Ok(sources)
}

fn validate_source(source: &SourceSpec) -> Result<(), ConfigError> {
    if source.id.is_empty() {
        return Err(ConfigError::Invalid(
            "source is missing required 'id'".to_string(),
        ));
    }
    if source.mapping.unified_fields.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "source '{}': mapping.unified_fields must be a non-empty mapping",
            source.id
        )));
    }
    if source.api.is_none() && source.html.is_none() {
        return Err(ConfigError::Invalid(format!(
            "source '{}' must define at least one of 'api' or 'html'",
            source.id
        )));
    }
    if let Some(api) = &source.api {
        if api.enabled && api.base_url.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Invalid(format!(
                "source '{}': api.base_url is required when api is enabled",
                source.id
            )));
        }
    }
    if let Some(html) = &source.html {
        if html.enabled && html.url.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Invalid(format!(
                "source '{}': html.url is required when html is enabled",
                source.id
            )));
        }
    }
    Ok(())
}

/// Expand `$VAR` / `${VAR}` in every string of a parsed YAML tree.
/// Unset variables are left verbatim.
fn expand_env(value: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;
    match value {
        Value::String(s) => Value::String(expand_env_str(&s)),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(expand_env).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, item)| (key, expand_env(item)))
                .collect(),
        ),
        other => other,
    }
}

fn expand_env_str(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() {
            if bytes[i + 1] == b'{' {
                if let Some(end) = input[i + 2..].find('}') {
                    let name = &input[i + 2..i + 2 + end];
                    if is_var_name(name) {
                        match env::var(name) {
                            Ok(value) => out.push_str(&value),
                            Err(_) => out.push_str(&input[i..i + end + 3]),
                        }
                        i += end + 3;
                        continue;
                    }
                }
            } else if bytes[i + 1] == b'_' || bytes[i + 1].is_ascii_alphabetic() {
                let mut j = i + 1;
                while j < bytes.len() && (bytes[j] == b'_' || bytes[j].is_ascii_alphanumeric()) {
                    j += 1;
                }
                let name = &input[i + 1..j];
                match env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => out.push_str(&input[i..j]),
                }
                i = j;
                continue;
            }
        }
        let ch = input[i..].chars().next().unwrap_or('\u{FFFD}');
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b == b'_' || b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
- id: products
  api:
    enabled: true
    base_url: "https://api.example.test/items/{external_id}"
    method: GET
    params:
      expand: details
      per_page: 5
    headers:
      Accept: application/json
    json_key_map:
      title: data.title
      price: data.price.amount
  html:
    enabled: true
    url: "https://example.test/items/{external_id}"
    selectors:
      description: "div.description"
      image: "img.hero::attr(src)"
  mapping:
    unified_fields:
      title: api.title
      price: api.price
      description: html.description
      image: html.image
    field_types:
      price: float
"#;

    #[test]
    fn test_parse_full_source() {
        let sources = parse_sources(SAMPLE).unwrap();
        assert_eq!(sources.len(), 1);

        let source = &sources[0];
        assert_eq!(source.id, "products");

        let api = source.api.as_ref().unwrap();
        assert!(api.enabled);
        assert_eq!(api.method, "GET");
        assert_eq!(api.params["per_page"], serde_json::json!(5));
        assert_eq!(api.json_key_map["price"], "data.price.amount");

        let html = source.html.as_ref().unwrap();
        assert_eq!(html.selectors["image"], "img.hero::attr(src)");

        // Declaration order is preserved for downstream column ordering.
        let fields: Vec<&String> = source.mapping.unified_fields.keys().collect();
        assert_eq!(fields, ["title", "price", "description", "image"]);
        assert_eq!(source.mapping.field_types["price"], FieldType::Float);
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
- id: minimal
  html:
    url: "https://example.test/page"
  mapping:
    unified_fields:
      title: html.title
"#;
        let sources = parse_sources(yaml).unwrap();
        let html = sources[0].html.as_ref().unwrap();
        assert!(html.enabled);
        assert!(sources[0].api.is_none());
        assert!(sources[0].mapping.field_types.is_empty());
    }

    #[test]
    fn test_top_level_must_be_a_list() {
        let err = parse_sources("id: nope").unwrap_err();
        assert!(err.to_string().contains("list of sources"));
    }

    #[test]
    fn test_requires_api_or_html() {
        let yaml = r#"
- id: empty
  mapping:
    unified_fields:
      title: api.title
"#;
        let err = parse_sources(yaml).unwrap_err();
        assert!(err.to_string().contains("at least one of 'api' or 'html'"));
    }

    #[test]
    fn test_enabled_api_requires_base_url() {
        let yaml = r#"
- id: broken
  api:
    enabled: true
  mapping:
    unified_fields:
      title: api.title
"#;
        let err = parse_sources(yaml).unwrap_err();
        assert!(err.to_string().contains("api.base_url is required"));
    }

    #[test]
    fn test_disabled_api_needs_no_url() {
        let yaml = r#"
- id: dormant
  api:
    enabled: false
  html:
    url: "https://example.test/p"
  mapping:
    unified_fields:
      title: html.title
"#;
        assert!(parse_sources(yaml).is_ok());
    }

    #[test]
    fn test_env_expansion() {
        env::set_var("COLLATE_TEST_TOKEN", "sekrit");
        let yaml = r#"
- id: authed
  api:
    base_url: "https://api.example.test/v1"
    headers:
      Authorization: "Bearer ${COLLATE_TEST_TOKEN}"
      X-Unset: "$COLLATE_TEST_UNSET_VAR"
  mapping:
    unified_fields:
      title: api.title
"#;
        let sources = parse_sources(yaml).unwrap();
        let api = sources[0].api.as_ref().unwrap();
        assert_eq!(api.headers["Authorization"], "Bearer sekrit");
        // Unset variables stay verbatim.
        assert_eq!(api.headers["X-Unset"], "$COLLATE_TEST_UNSET_VAR");
    }

    #[test]
    fn test_expand_env_str_edge_cases() {
        assert_eq!(expand_env_str("no vars"), "no vars");
        assert_eq!(expand_env_str("100$"), "100$");
        assert_eq!(expand_env_str("${not closed"), "${not closed");
        assert_eq!(expand_env_str("${}"), "${}");
    }
}
