//! Document transform - the JSON Schema envelope for a whole SDL document.

use serde_json::{Map, Value};
use tracing::debug;

use crate::ast::{Definition, SchemaDocument};
use crate::builder::build;
use crate::types::{TransformOptions, DRAFT_04, RESERVED_FORMAT_DEFINITION};

/// Transform a parsed SDL document into a JSON Schema envelope.
///
/// Returns `{"$schema": <draft-04>, "definitions": {...}}`. A document with no
/// definitions at all yields an empty object instead; one holding only
/// directive declarations or the reserved format enum still gets the envelope,
/// with empty `definitions`. Definitions that share a title overwrite each
/// other; the last one wins.
pub fn transform(document: &SchemaDocument) -> Value {
    transform_with(document, &TransformOptions::default())
}

/// Transform with explicit options.
pub fn transform_with(document: &SchemaDocument, options: &TransformOptions) -> Value {
    if document.is_empty() {
        return Value::Object(Map::new());
    }

    let mut definitions = Map::new();

    for definition in document.definitions.iter().filter(|d| is_schema_definition(d)) {
        let Some(schema) = build(definition) else {
            continue;
        };
        let title = definition.name().to_string();
        if definitions.contains_key(&title) {
            debug!(title = %title, "duplicate definition overwrites an earlier one");
        }
        definitions.insert(title, Value::Object(schema));
    }

    if options.strict {
        close_definitions(&mut definitions);
    }

    let mut envelope = Map::new();
    envelope.insert("$schema".to_string(), Value::String(DRAFT_04.to_string()));
    envelope.insert("definitions".to_string(), Value::Object(definitions));
    Value::Object(envelope)
}

fn is_schema_definition(definition: &Definition) -> bool {
    if matches!(definition, Definition::Directive(_)) {
        debug!(name = definition.name(), "skipping directive declaration");
        return false;
    }
    if definition.name() == RESERVED_FORMAT_DEFINITION {
        debug!(name = definition.name(), "skipping reserved definition");
        return false;
    }
    true
}

/// Set `additionalProperties: false` on every object definition.
///
/// Only sets the value if `additionalProperties` is missing or explicitly
/// `true`; a custom schema is left untouched.
pub(crate) fn close_definitions(definitions: &mut Map<String, Value>) {
    for definition in definitions.values_mut() {
        let Value::Object(map) = definition else {
            continue;
        };
        let is_object_schema = map
            .get("type")
            .and_then(|t| t.as_str())
            .map(|t| t == "object")
            .unwrap_or(false);
        if !is_object_schema {
            continue;
        }
        match map.get("additionalProperties") {
            None | Some(Value::Bool(true)) => {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            _ => {}
        }
    }
}
