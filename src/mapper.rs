//! Type mapping - GraphQL type references to JSON Schema fragments.

use serde_json::{json, Map, Value};

use crate::ast::TypeReference;
use crate::types::{primitive_json_type, DATE_TIME_SCALAR, DEFINITIONS_REF_PREFIX};

/// The position a type reference is resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    /// A field type, a union member, or anything not nested in a list.
    #[default]
    Field,
    /// The element type of a list.
    ListItem,
}

/// A resolved type: the schema fragment plus whether a non-null wrapper made
/// the enclosing field required.
///
/// Requiredness is carried beside the schema, never inside it, so the emitted
/// property objects cannot leak it.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeFragment {
    pub schema: Map<String, Value>,
    pub required: bool,
}

impl TypeFragment {
    fn new(schema: Map<String, Value>) -> Self {
        Self {
            schema,
            required: false,
        }
    }

    /// The single JSON type of the fragment, if it has one.
    ///
    /// `$ref` fragments and nullable element unions have none.
    pub fn json_type(&self) -> Option<&str> {
        self.schema.get("type").and_then(Value::as_str)
    }
}

/// Resolve a type reference in the given context.
pub fn resolve(type_ref: &TypeReference, context: Context) -> TypeFragment {
    match type_ref {
        TypeReference::NonNull(inner) => {
            let mut fragment = resolve(inner, context);
            // Inside a list, non-null describes the element, not the field.
            if context != Context::ListItem {
                fragment.required = true;
            }
            fragment
        }
        TypeReference::List(inner) => {
            let items = resolve(inner, Context::ListItem);
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!("array"));
            schema.insert("items".to_string(), Value::Object(items.schema));
            TypeFragment::new(schema)
        }
        TypeReference::Named(name) => TypeFragment::new(resolve_named(name, context)),
    }
}

fn resolve_named(name: &str, context: Context) -> Map<String, Value> {
    let mut schema = Map::new();

    if name == DATE_TIME_SCALAR {
        schema.insert("type".to_string(), json!("string"));
        schema.insert("format".to_string(), json!("date-time"));
    } else if let Some(json_type) = primitive_json_type(name) {
        let ty = match context {
            // Draft-04 cannot mark a single list element nullable, so every
            // primitive element admits null.
            Context::ListItem => json!([json_type, "null"]),
            Context::Field => json!(json_type),
        };
        schema.insert("type".to_string(), ty);
    } else {
        schema.insert(
            "$ref".to_string(),
            Value::String(format!("{}{}", DEFINITIONS_REF_PREFIX, name)),
        );
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeReference {
        TypeReference::named(name)
    }

    #[test]
    fn primitive_field() {
        let fragment = resolve(&named("Int"), Context::Field);
        assert_eq!(Value::Object(fragment.schema.clone()), json!({ "type": "integer" }));
        assert_eq!(fragment.json_type(), Some("integer"));
        assert!(!fragment.required);
    }

    #[test]
    fn non_null_field_is_required() {
        let fragment = resolve(&TypeReference::non_null(named("String")), Context::Field);
        assert_eq!(Value::Object(fragment.schema), json!({ "type": "string" }));
        assert!(fragment.required);
    }

    #[test]
    fn named_type_becomes_ref() {
        let fragment = resolve(&named("Address"), Context::Field);
        assert_eq!(
            Value::Object(fragment.schema.clone()),
            json!({ "$ref": "#/definitions/Address" })
        );
        assert_eq!(fragment.json_type(), None);
    }

    #[test]
    fn list_elements_admit_null() {
        let fragment = resolve(&TypeReference::list(named("Float")), Context::Field);
        assert_eq!(
            Value::Object(fragment.schema.clone()),
            json!({ "type": "array", "items": { "type": ["number", "null"] } })
        );
        assert_eq!(fragment.json_type(), Some("array"));
        assert!(!fragment.required);
    }

    #[test]
    fn non_null_inside_list_is_not_required() {
        // [String!]!
        let ty = TypeReference::non_null(TypeReference::list(TypeReference::non_null(named(
            "String",
        ))));
        let fragment = resolve(&ty, Context::Field);
        assert_eq!(
            Value::Object(fragment.schema.clone()),
            json!({ "type": "array", "items": { "type": ["string", "null"] } })
        );
        assert!(fragment.required);
        assert!(fragment.schema["items"].get("required").is_none());
    }

    #[test]
    fn nested_lists() {
        let ty = TypeReference::list(TypeReference::list(named("Boolean")));
        let fragment = resolve(&ty, Context::Field);
        assert_eq!(
            Value::Object(fragment.schema),
            json!({
                "type": "array",
                "items": {
                    "type": "array",
                    "items": { "type": ["boolean", "null"] }
                }
            })
        );
    }

    #[test]
    fn list_of_refs() {
        let ty = TypeReference::list(TypeReference::non_null(named("Post")));
        let fragment = resolve(&ty, Context::Field);
        assert_eq!(
            Value::Object(fragment.schema),
            json!({ "type": "array", "items": { "$ref": "#/definitions/Post" } })
        );
    }

    #[test]
    fn date_time_ignores_context() {
        let field = resolve(&named("DateTime"), Context::Field);
        let item = resolve(&named("DateTime"), Context::ListItem);
        let expected = json!({ "type": "string", "format": "date-time" });
        assert_eq!(Value::Object(field.schema), expected);
        assert_eq!(Value::Object(item.schema), expected);
    }
}
