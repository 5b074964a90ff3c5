//! Argument normalization and request encoding.

use ferrogram_core::{Args, FormBody};
use serde_json::{Map, Value};

/// Request verb of an RPC call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verb {
    /// Arguments travel as a query string.
    Get,
    /// Arguments travel as a multipart body.
    #[default]
    Post,
}

/// Returns `true` for values the platform treats as "not set".
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Renders one argument as a form field value.
pub(crate) fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        nested => nested.to_string(),
    }
}

/// Applies defaults, prettifies structured `text` and drops falsy values.
pub(crate) fn normalize(args: Args, defaults: &Map<String, Value>) -> Vec<(String, Value)> {
    args.with_defaults(defaults)
        .into_inner()
        .into_iter()
        .filter(|(_, value)| !is_falsy(value))
        .map(|(key, value)| match value {
            Value::Array(_) | Value::Object(_) if key == "text" => {
                let pretty = serde_json::to_string_pretty(&value).unwrap_or_default();
                (key, Value::String(pretty))
            }
            value => (key, value),
        })
        .collect()
}

async fn is_local_file(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.contains('\0') {
        return false;
    }
    tokio::fs::metadata(candidate)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

/// Builds a multipart body; strings naming an existing non-empty file become
/// file parts.
pub(crate) async fn build_form(args: Vec<(String, Value)>) -> FormBody {
    let mut form = FormBody::new();
    for (key, value) in args {
        form = match &value {
            Value::String(path) if is_local_file(path).await => form.file(key, path.as_str()),
            _ => form.text(key, encode_value(&value)),
        };
    }
    form
}

/// Builds query pairs for a GET call.
pub(crate) fn build_query(args: Vec<(String, Value)>) -> Vec<(String, String)> {
    args.into_iter()
        .map(|(key, value)| {
            let encoded = encode_value(&value);
            (key, encoded)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrogram_core::FormPart;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_falsy_values() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(is_falsy(&v), "{v} should be falsy");
        }
        for v in [json!(true), json!(1), json!("a"), json!("00"), json!([0]), json!({"a": null})] {
            assert!(!is_falsy(&v), "{v} should be kept");
        }
    }

    #[test]
    fn test_normalize_defaults_and_text() {
        let mut defaults = Map::new();
        defaults.insert("parse_mode".into(), json!("HTML"));
        defaults.insert("chat_id".into(), json!(9));

        let args = Args::new()
            .with("chat_id", 1)
            .with("text", json!({"a": 1}))
            .with("disable_notification", false);
        let normalized: Map<String, Value> = normalize(args, &defaults).into_iter().collect();

        assert_eq!(normalized["chat_id"], 1);
        assert_eq!(normalized["parse_mode"], "HTML");
        assert_eq!(normalized["text"], "{\n  \"a\": 1\n}");
        assert!(!normalized.contains_key("disable_notification"));
    }

    #[test]
    fn test_encode_nested_as_json() {
        assert_eq!(encode_value(&json!("x")), "x");
        assert_eq!(encode_value(&json!(42)), "42");
        assert_eq!(encode_value(&json!(true)), "true");
        assert_eq!(encode_value(&json!({"k": [1, 2]})), r#"{"k":[1,2]}"#);
    }

    #[tokio::test]
    async fn test_existing_file_becomes_file_part() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"image bytes").unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let empty = tempfile::NamedTempFile::new().unwrap();
        let empty_path = empty.path().to_string_lossy().into_owned();

        let form = build_form(vec![
            ("photo".into(), json!(path.clone())),
            ("document".into(), json!(empty_path.clone())),
            ("caption".into(), json!("no/such/file.png")),
        ])
        .await;

        let parts = form.parts();
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], FormPart::File { name, path: p } if name == "photo" && p.to_string_lossy() == path));
        assert!(matches!(&parts[1], FormPart::Text { value, .. } if *value == empty_path));
        assert!(matches!(&parts[2], FormPart::Text { value, .. } if value == "no/such/file.png"));
    }

    #[test]
    fn test_query_pairs() {
        let query = build_query(vec![
            ("offset".into(), json!(5)),
            ("allowed_updates".into(), json!(["message"])),
        ]);
        assert_eq!(
            query,
            vec![
                ("offset".to_string(), "5".to_string()),
                ("allowed_updates".to_string(), r#"["message"]"#.to_string()),
            ]
        );
    }
}
