//! Payload validation against converted schemas.

use serde_json::{json, Map, Value};

use crate::error::{SchemaError, ValidateError};
use crate::extension::extend;
use crate::transform::close_definitions;
use crate::types::{DEFINITIONS_REF_PREFIX, DRAFT_04, GRAPHQL_ENUM, GRAPHQL_SCALAR, GRAPHQL_UNION};

/// Options for payload validation.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// When true, payload objects may not carry fields their definition lacks.
    pub strict: bool,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode (additionalProperties: false on all object definitions).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Rewrite the definitions of a converted envelope into plain draft-04.
///
/// Enums keep only their `enum` list, unions their `oneOf`, and scalars accept
/// any value. The `input` flag is dropped.
pub fn lower_definitions(envelope: &Value) -> Map<String, Value> {
    let Some(definitions) = envelope.get("definitions").and_then(Value::as_object) else {
        return Map::new();
    };

    let mut lowered = Map::new();
    for (name, definition) in definitions {
        lowered.insert(name.clone(), lower_definition(definition));
    }
    lowered
}

fn lower_definition(definition: &Value) -> Value {
    let Value::Object(map) = definition else {
        return definition.clone();
    };

    let mut result = Map::new();
    if let Some(title) = map.get("title") {
        result.insert("title".to_string(), title.clone());
    }

    match map.get("type").and_then(Value::as_str) {
        Some(GRAPHQL_ENUM) => {
            if let Some(values) = map.get("enum") {
                result.insert("enum".to_string(), values.clone());
            }
        }
        Some(GRAPHQL_UNION) => {
            if let Some(members) = map.get("oneOf") {
                result.insert("oneOf".to_string(), members.clone());
            }
        }
        Some(GRAPHQL_SCALAR) => {}
        _ => {
            for (key, value) in map {
                if key != "input" {
                    result.insert(key.clone(), value.clone());
                }
            }
        }
    }

    Value::Object(result)
}

/// Validate a payload against one definition of a converted envelope.
///
/// # Errors
///
/// Returns `ValidateError::UnknownDefinition` if `type_name` is not defined,
/// `ValidateError::InvalidSchema` if the schema does not compile, or
/// `ValidateError::Invalid` if the payload doesn't match.
pub fn validate(
    envelope: &Value,
    type_name: &str,
    payload: &Value,
    options: &ValidateOptions,
) -> Result<(), ValidateError> {
    let mut definitions = lower_definitions(envelope);
    if !definitions.contains_key(type_name) {
        return Err(ValidateError::UnknownDefinition {
            name: type_name.to_string(),
        });
    }

    if options.strict {
        close_definitions(&mut definitions);
    }

    let schema = json!({
        "$schema": DRAFT_04,
        "definitions": definitions,
        "$ref": format!("{}{}", DEFINITIONS_REF_PREFIX, type_name),
    });

    validate_against_schema(&schema, payload)
}

/// Validate a payload against any schema fragment, with the extended keywords
/// registered.
///
/// Use this for a single converted property, or when the schema has already
/// been lowered.
pub fn validate_against_schema(schema: &Value, payload: &Value) -> Result<(), ValidateError> {
    let mut options = jsonschema::options();
    extend(&mut options);

    let validator = options
        .build(schema)
        .map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(payload)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
