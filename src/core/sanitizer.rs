use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{ProductSuggestion, Verdict};

/// Why a summarization payload was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("empty input after stripping formatting")]
    EmptyInput,

    #[error("payload is not valid JSON")]
    MalformedJson,

    #[error("JSON shape does not contain a products list")]
    SchemaMismatch,
}

/// Loosely-shaped product entry as the model actually returns it.
///
/// The instruction contract asks for `product_name`, but models drift; the
/// original service prompted for `name`, so both spellings are accepted.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(alias = "name", alias = "productName", default)]
    product_name: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Parse and validate the summarization collaborator's output.
///
/// The collaborator is contractually asked for pure JSON but is not trusted
/// to comply: fences are stripped wherever they appear, entries without a
/// name are dropped rather than failing the batch, and unknown verdicts are
/// coerced to `manual`. Errors never propagate past this boundary as panics.
pub fn sanitize(raw: &str) -> Result<Vec<ProductSuggestion>, SanitizeError> {
    let stripped = strip_code_fences(raw);
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        return Err(SanitizeError::EmptyInput);
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|_| SanitizeError::MalformedJson)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("products") {
            Some(Value::Array(items)) => items.clone(),
            _ => return Err(SanitizeError::SchemaMismatch),
        },
        _ => return Err(SanitizeError::SchemaMismatch),
    };

    let products = items
        .into_iter()
        .filter_map(|item| {
            let raw: RawSuggestion = serde_json::from_value(item).ok()?;
            let name = raw.product_name?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(ProductSuggestion {
                product_name: name,
                company: raw.company,
                verdict: Verdict::from_loose(raw.verdict.as_deref().unwrap_or("")),
                summary: raw.summary,
                content: raw.content.unwrap_or_default(),
            })
        })
        .collect();

    Ok(products)
}

/// Remove every code-fence marker, including a trailing language tag.
///
/// Models sometimes wrap partial text, so fences are removed anywhere in the
/// string, not only at the boundaries.
fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];
        let tag_len: usize = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .map(char::len_utf8)
            .sum();
        rest = &rest[tag_len..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fences_with_language_tag() {
        let raw = "```json\n{\"products\":[]}\n```";
        let products = sanitize(raw).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_strips_fences_mid_string() {
        let raw = "{\"products\":[{\"product_name\":\"Plan A\",```\n\"verdict\":\"pass\"}]}";
        let products = sanitize(raw).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_name, "Plan A");
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(sanitize("not json at all"), Err(SanitizeError::MalformedJson));
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(sanitize(""), Err(SanitizeError::EmptyInput));
        assert_eq!(sanitize("```json\n```"), Err(SanitizeError::EmptyInput));
    }

    #[test]
    fn test_rejects_object_without_products() {
        assert_eq!(
            sanitize("{\"advice\":\"see a doctor\"}"),
            Err(SanitizeError::SchemaMismatch)
        );
        assert_eq!(sanitize("42"), Err(SanitizeError::SchemaMismatch));
    }

    #[test]
    fn test_accepts_top_level_array() {
        let raw = r#"[{"name":"Plan A","company":"平安","verdict":"exclude"}]"#;
        let products = sanitize(raw).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].verdict, Verdict::Exclude);
        assert_eq!(products[0].company.as_deref(), Some("平安"));
    }

    #[test]
    fn test_drops_nameless_entries() {
        let raw = r#"{"products":[
            {"verdict":"pass","content":"no name here"},
            {"product_name":"  ","verdict":"pass"},
            {"product_name":"Plan B","verdict":"pass"}
        ]}"#;
        let products = sanitize(raw).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_name, "Plan B");
    }

    #[test]
    fn test_coerces_unknown_verdict_to_manual() {
        let raw = r#"{"products":[{"product_name":"Plan A","verdict":"definitely-fine"}]}"#;
        let products = sanitize(raw).unwrap();
        assert_eq!(products[0].verdict, Verdict::Manual);
    }

    #[test]
    fn test_missing_verdict_becomes_manual() {
        let raw = r#"{"products":[{"product_name":"Plan A"}]}"#;
        let products = sanitize(raw).unwrap();
        assert_eq!(products[0].verdict, Verdict::Manual);
    }
}
