//! # Document Loading
//!
//! Reads packet and schema files from disk. The format is chosen by file
//! extension: `.yaml`/`.yml` for YAML, anything else for JSON. YAML documents
//! are converted to the equivalent `serde_json::Value` tree before they reach
//! the validator, so both formats are checked identically.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

/// Read and parse a JSON or YAML document.
///
/// `label` names the document in error messages (`"packet"`, `"schema"`).
pub fn load_document(path: &Path, label: &str) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {label} file {}", path.display()))?;

    let value = if is_yaml(path) {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid {label} YAML in {}", path.display()))?;
        yaml_to_json_value(&yaml)
            .map_err(|reason| anyhow!(reason))
            .with_context(|| format!("{label} YAML in {} has no JSON equivalent", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid {label} JSON in {}", path.display()))?
    };

    tracing::debug!(path = %path.display(), label, "loaded document");
    Ok(value)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Mapping key order is kept, so `additionalProperties` issues are reported
/// in document order for YAML packets too. Tags are dropped.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packet.json");
        std::fs::write(&path, r#"{"id": "ctx-1", "tags": ["a"]}"#).unwrap();
        let value = load_document(&path, "packet").unwrap();
        assert_eq!(value, json!({"id": "ctx-1", "tags": ["a"]}));
    }

    #[test]
    fn loads_yaml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["packet.yaml", "packet.yml"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "id: ctx-1\nttl: 1h\ncount: 3\ntags:\n  - a\n").unwrap();
            let value = load_document(&path, "packet").unwrap();
            assert_eq!(value, json!({"id": "ctx-1", "ttl": "1h", "count": 3, "tags": ["a"]}));
        }
    }

    #[test]
    fn yaml_keeps_key_order() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("zeta: 1\nalpha: 2\n").unwrap();
        let json = yaml_to_json_value(&yaml).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn yaml_non_scalar_keys_are_rejected() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: 1\n").unwrap();
        assert!(yaml_to_json_value(&yaml).is_err());
    }

    #[test]
    fn missing_file_names_label_and_path() {
        let err = load_document(Path::new("/nonexistent/ctxb/packet.json"), "packet").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to read packet file"), "{msg}");
        assert!(msg.contains("/nonexistent/ctxb/packet.json"), "{msg}");
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = load_document(&path, "schema").unwrap_err();
        assert!(format!("{err:#}").contains("invalid schema JSON"));
    }
}
