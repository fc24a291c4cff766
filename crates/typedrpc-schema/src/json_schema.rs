use std::fmt::{self, Write as _};
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use jsonschema::paths::{Location, LocationSegment};
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};
use crate::typed::decode;
use crate::validator::{Diagnostic, Diagnostics, Schema};

/// A compiled JSON Schema document plus the Rust type it decodes into.
///
/// Validation runs the JSON Schema checks first, then decodes the value
/// into `T`. Use `T = Value` when only the structural checks matter.
pub struct JsonSchema<T = Value> {
    validator: Validator,
    document: Value,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSchema<T> {
    /// Compile a schema document with default config.
    pub fn compile(document: &Value) -> Result<Self> {
        Self::compile_with_config(document, &SchemaConfig::default())
    }

    /// Compile a schema document with explicit config.
    pub fn compile_with_config(document: &Value, config: &SchemaConfig) -> Result<Self> {
        let mut document = document.clone();
        if config.strict_mode {
            apply_strict_mode(&mut document);
        }

        let validator = jsonschema::validator_for(&document)
            .map_err(|err| SchemaError::CompileFailed(err.to_string()))?;

        Ok(Self {
            validator,
            document,
            _marker: PhantomData,
        })
    }

    /// Compile a schema from JSON text.
    pub fn from_json_str(schema_json: &str) -> Result<Self> {
        Self::from_json_str_with_config(schema_json, &SchemaConfig::default())
    }

    /// Compile a schema from JSON text with explicit config.
    pub fn from_json_str_with_config(schema_json: &str, config: &SchemaConfig) -> Result<Self> {
        let document: Value = serde_json::from_str(schema_json)?;
        Self::compile_with_config(&document, config)
    }

    /// Load and compile a schema file.
    pub fn from_file(path: &Path, config: &SchemaConfig) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|err| {
            SchemaError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
        })?;
        let metadata = file
            .metadata()
            .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
        if !metadata.is_file() {
            return Err(SchemaError::LoadFailed(format!(
                "not a regular file: {}",
                path.display()
            )));
        }
        if metadata.len() > config.max_schema_file_size as u64 {
            return Err(SchemaError::LoadFailed(format!(
                "schema file too large ({} bytes): {}",
                metadata.len(),
                path.display()
            )));
        }

        let max_bytes = config.max_schema_file_size;
        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut content = String::new();
        file.take(read_limit)
            .read_to_string(&mut content)
            .map_err(|err| {
                SchemaError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
            })?;
        if content.len() > max_bytes {
            return Err(SchemaError::LoadFailed(format!(
                "schema file too large while reading: {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded schema file");
        Self::from_json_str_with_config(&content, config)
    }

    /// The document as compiled, including any strict-mode rewrites.
    pub fn document(&self) -> &Value {
        &self.document
    }

    fn check(&self, value: &Value) -> std::result::Result<(), Diagnostics> {
        let errors = self
            .validator
            .iter_errors(value)
            .map(|err| Diagnostic::new(field_path(err.instance_path()), err.to_string()));
        match Diagnostics::collect(errors) {
            Some(diagnostics) => Err(diagnostics),
            None => Ok(()),
        }
    }
}

impl<T: DeserializeOwned> Schema for JsonSchema<T> {
    type Output = T;

    fn validate(&self, value: &Value) -> std::result::Result<T, Diagnostics> {
        self.check(value)?;
        decode(value)
    }
}

impl<T> fmt::Debug for JsonSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("document", &self.document)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// JSON Pointer to the dotted and indexed form decode diagnostics use,
/// e.g. `/users/0/age` becomes `users[0].age`.
fn field_path(location: &Location) -> String {
    let mut path = String::new();
    for segment in location {
        match segment {
            LocationSegment::Property(name) => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(&name);
            }
            LocationSegment::Index(idx) => {
                let _ = write!(path, "[{idx}]");
            }
        }
    }
    path
}

fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            recurse_object_schema_children(map);
        }
        Value::Array(items) => {
            for item in items {
                apply_strict_mode(item);
            }
        }
        _ => {}
    }
}

fn recurse_object_schema_children(map: &mut Map<String, Value>) {
    for key in ["properties", "patternProperties", "dependentSchemas", "$defs", "definitions"] {
        if let Some(Value::Object(obj)) = map.get_mut(key) {
            for value in obj.values_mut() {
                apply_strict_mode(value);
            }
        }
    }

    for key in [
        "propertyNames",
        "additionalProperties",
        "unevaluatedProperties",
        "items",
        "additionalItems",
        "unevaluatedItems",
        "contains",
        "not",
        "if",
        "then",
        "else",
    ] {
        if let Some(value) = map.get_mut(key) {
            apply_strict_mode(value);
        }
    }

    for key in ["prefixItems", "allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(items)) = map.get_mut(key) {
            for item in items {
                apply_strict_mode(item);
            }
        }
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    const OBJECT_KEYWORDS: [&str; 5] = [
        "properties",
        "patternProperties",
        "required",
        "dependentRequired",
        "propertyNames",
    ];

    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(kind) if kind == "object")),
        _ => OBJECT_KEYWORDS
            .iter()
            .any(|keyword| map.contains_key(*keyword)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    const PERSON_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "age": { "type": "integer", "minimum": 0 }
        },
        "required": ["name", "age"]
    }"#;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Person {
        name: String,
        age: u32,
    }

    #[test]
    fn validates_and_decodes() {
        let schema = JsonSchema::<Person>::from_json_str(PERSON_SCHEMA).unwrap();
        let person = schema.validate(&json!({"name": "Alice", "age": 30})).unwrap();
        assert_eq!(person.name, "Alice");
        assert_eq!(person.age, 30);
    }

    #[test]
    fn structural_failure_is_reported() {
        let schema = JsonSchema::<Person>::from_json_str(PERSON_SCHEMA).unwrap();
        let diagnostics = schema
            .validate(&json!({"name": "Alice", "age": "thirty"}))
            .unwrap_err();
        assert!(diagnostics.to_string().contains("thirty"));

        assert!(schema.validate(&json!({"name": "Alice"})).is_err());
        assert!(schema.validate(&Value::Null).is_err());
    }

    #[test]
    fn structural_failure_names_nested_field() {
        let schema = JsonSchema::<Value>::compile(&json!({
            "type": "object",
            "properties": {
                "user": {
                    "type": "object",
                    "properties": { "age": { "type": "integer" } }
                },
                "tags": { "type": "array", "items": { "type": "string" } }
            }
        }))
        .unwrap();

        let diagnostics = schema
            .validate(&json!({"user": {"age": "thirty"}}))
            .unwrap_err();
        let first = diagnostics.iter().next().unwrap();
        assert_eq!(first.path, "user.age");
        assert!(diagnostics.to_string().starts_with("at `user.age`: "));

        let diagnostics = schema.validate(&json!({"tags": ["a", 2]})).unwrap_err();
        assert_eq!(diagnostics.iter().next().unwrap().path, "tags[1]");

        let nested = schema
            .validate(&json!({"user": {"age": 1.5}}))
            .unwrap_err()
            .nested("val");
        assert_eq!(nested.iter().next().unwrap().path, "val.user.age");
    }

    #[test]
    fn root_failure_has_empty_path() {
        let schema = JsonSchema::<Value>::from_json_str(PERSON_SCHEMA).unwrap();
        let diagnostics = schema.validate(&json!("not an object")).unwrap_err();
        assert!(diagnostics.iter().all(|diagnostic| diagnostic.path.is_empty()));
    }

    #[test]
    fn keyword_constraints_apply_before_decoding() {
        let schema = JsonSchema::<Person>::from_json_str(PERSON_SCHEMA).unwrap();
        assert!(schema.validate(&json!({"name": "Bob", "age": -1})).is_err());
    }

    #[test]
    fn untyped_schema_returns_value() {
        let schema = JsonSchema::<Value>::from_json_str(r#"{"type":"array","items":{"type":"boolean"}}"#)
            .unwrap();
        assert_eq!(schema.validate(&json!([true, false])).unwrap(), json!([true, false]));
        assert!(schema.validate(&json!([true, 1])).is_err());
    }

    #[test]
    fn invalid_schema_fails_compile() {
        let result = JsonSchema::<Value>::from_json_str(r#"{"type":"definitely-not-a-type"}"#);
        assert!(matches!(result, Err(SchemaError::CompileFailed(_))));

        let result = JsonSchema::<Value>::from_json_str("not json");
        assert!(matches!(result, Err(SchemaError::InvalidJson(_))));
    }

    #[test]
    fn strict_mode_rejects_additional_properties() {
        let permissive = JsonSchema::<Value>::from_json_str(PERSON_SCHEMA).unwrap();
        let strict = JsonSchema::<Value>::from_json_str_with_config(
            PERSON_SCHEMA,
            &SchemaConfig {
                strict_mode: true,
                ..SchemaConfig::default()
            },
        )
        .unwrap();

        let payload = json!({"name": "ok", "age": 1, "extra": true});
        assert!(permissive.validate(&payload).is_ok());
        assert!(strict.validate(&payload).is_err());
        assert_eq!(strict.document()["additionalProperties"], json!(false));
    }

    #[test]
    fn strict_mode_applies_nested_objects_and_keyword_only_schemas() {
        let schema = json!({
            "properties": {
                "nested": {
                    "type": "object",
                    "properties": { "v": { "type": "integer" } },
                    "required": ["v"]
                }
            },
            "required": ["nested"]
        });
        let strict = JsonSchema::<Value>::compile_with_config(
            &schema,
            &SchemaConfig {
                strict_mode: true,
                ..SchemaConfig::default()
            },
        )
        .unwrap();

        assert!(strict.validate(&json!({"nested": {"v": 1}})).is_ok());
        assert!(strict.validate(&json!({"nested": {"v": 1, "extra": true}})).is_err());
        assert!(strict.validate(&json!({"nested": {"v": 1}, "extra": 1})).is_err());
    }

    #[test]
    fn strict_mode_reaches_item_schemas() {
        let schema = json!({
            "type": "array",
            "prefixItems": [{ "type": "integer" }],
            "unevaluatedItems": {
                "type": "object",
                "properties": { "id": { "type": "integer" } }
            }
        });
        let strict = JsonSchema::<Value>::compile_with_config(
            &schema,
            &SchemaConfig {
                strict_mode: true,
                ..SchemaConfig::default()
            },
        )
        .unwrap();

        assert_eq!(
            strict.document()["unevaluatedItems"]["additionalProperties"],
            json!(false)
        );
        assert!(strict.validate(&json!([1, {"id": 2}])).is_ok());
        assert!(strict.validate(&json!([1, {"id": 2, "extra": true}])).is_err());

        let legacy = JsonSchema::<Value>::compile_with_config(
            &json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": "array",
                "items": [{ "type": "integer" }],
                "additionalItems": { "properties": { "id": { "type": "integer" } } }
            }),
            &SchemaConfig {
                strict_mode: true,
                ..SchemaConfig::default()
            },
        )
        .unwrap();
        assert_eq!(
            legacy.document()["additionalItems"]["additionalProperties"],
            json!(false)
        );
    }

    #[test]
    fn strict_mode_keeps_explicit_additional_properties() {
        let schema = json!({
            "type": "object",
            "additionalProperties": { "type": "string" }
        });
        let strict = JsonSchema::<Value>::compile_with_config(
            &schema,
            &SchemaConfig {
                strict_mode: true,
                ..SchemaConfig::default()
            },
        )
        .unwrap();
        assert!(strict.validate(&json!({"free": "form"})).is_ok());
    }

    fn make_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "typedrpc-schema-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn from_file_loads_and_validates() {
        let dir = make_temp_dir("from-file");
        let path = dir.join("person.schema.json");
        std::fs::write(&path, PERSON_SCHEMA).unwrap();

        let schema = JsonSchema::<Person>::from_file(&path, &SchemaConfig::default()).unwrap();
        assert!(schema.validate(&json!({"name": "Eve", "age": 2})).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_file_enforces_size_limit() {
        let dir = make_temp_dir("size-limit");
        let path = dir.join("person.schema.json");
        std::fs::write(&path, PERSON_SCHEMA).unwrap();

        let config = SchemaConfig {
            max_schema_file_size: 8,
            ..SchemaConfig::default()
        };
        let result = JsonSchema::<Value>::from_file(&path, &config);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_file_missing_is_load_failure() {
        let missing = std::env::temp_dir().join("typedrpc-schema-does-not-exist.schema.json");
        let result = JsonSchema::<Value>::from_file(&missing, &SchemaConfig::default());
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));
    }
}
