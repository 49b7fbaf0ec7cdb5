//! Field projection and per-definition schema building.

use serde_json::{json, Map, Value};

use crate::ast::{Definition, FieldDefinition, ObjectDefinition};
use crate::directive;
use crate::mapper::{resolve, Context};
use crate::types::{GRAPHQL_ENUM, GRAPHQL_SCALAR, GRAPHQL_UNION};

/// One field projected onto a JSON Schema property.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedField {
    pub title: String,
    pub schema: Map<String, Value>,
    /// A top-level non-null wrapper made the field required.
    pub required: bool,
}

/// Project a field: resolved type, then `title`, then every directive's
/// keywords in declaration order (later directives win on collisions).
pub fn project(field: &FieldDefinition) -> ProjectedField {
    let fragment = resolve(&field.ty, Context::Field);

    let mut keywords = Map::new();
    for applied in &field.directives {
        keywords.extend(directive::apply(applied, fragment.json_type()));
    }

    let mut schema = fragment.schema;
    schema.insert("title".to_string(), Value::String(field.name.clone()));
    schema.extend(keywords);

    ProjectedField {
        title: field.name.clone(),
        schema,
        required: fragment.required,
    }
}

/// Build the schema definition for one top-level definition.
///
/// Directive declarations carry no schema and yield `None`.
pub fn build(definition: &Definition) -> Option<Map<String, Value>> {
    let mut schema = Map::new();
    schema.insert(
        "title".to_string(),
        Value::String(definition.name().to_string()),
    );

    match definition {
        Definition::Scalar(_) => {
            schema.insert("type".to_string(), json!(GRAPHQL_SCALAR));
        }
        Definition::Union(union) => {
            let members: Vec<Value> = union
                .types
                .iter()
                .map(|member| Value::Object(resolve(member, Context::Field).schema))
                .collect();
            schema.insert("type".to_string(), json!(GRAPHQL_UNION));
            schema.insert("oneOf".to_string(), Value::Array(members));
        }
        Definition::Enum(enumeration) => {
            schema.insert("type".to_string(), json!(GRAPHQL_ENUM));
            schema.insert(
                "enum".to_string(),
                Value::Array(
                    enumeration
                        .values
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }
        Definition::Object(object) | Definition::Interface(object) => {
            build_object(object, &mut schema);
        }
        Definition::InputObject(object) => {
            build_object(object, &mut schema);
            schema.insert("input".to_string(), Value::Bool(true));
        }
        Definition::Directive(_) => return None,
    }

    Some(schema)
}

fn build_object(object: &ObjectDefinition, schema: &mut Map<String, Value>) {
    let fields: Vec<ProjectedField> = object.fields.iter().map(project).collect();

    let required: Vec<Value> = fields
        .iter()
        .filter(|field| field.required)
        .map(|field| Value::String(field.title.clone()))
        .collect();

    let mut properties = Map::new();
    for field in fields {
        let property = match field.schema.get("allOf") {
            Some(all_of) => json!({ "allOf": all_of }),
            None => Value::Object(field.schema),
        };
        properties.insert(field.title, property);
    }

    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
}
