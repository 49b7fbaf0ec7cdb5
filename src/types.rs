//! Core constants, lookup tables, and options for the SDL to JSON Schema transform.

use serde_json::Value;

/// `$schema` identifier of every emitted envelope.
pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

/// Prefix of every `$ref` the transform emits.
pub const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// `type` sentinels for definitions that have no plain JSON Schema shape.
pub const GRAPHQL_SCALAR: &str = "GRAPHQL_SCALAR";
pub const GRAPHQL_UNION: &str = "GRAPHQL_UNION";
pub const GRAPHQL_ENUM: &str = "GRAPHQL_ENUM";

/// Definition name reserved for carrying format configuration through the SDL.
/// It never becomes a schema definition.
pub const RESERVED_FORMAT_DEFINITION: &str = "StringValidationFormat";

/// The only directive the transform understands.
pub const VALIDATE_DIRECTIVE: &str = "validate";

/// Namespace for keywords standard JSON Schema does not define.
pub const EXTENDED_PREFIX: &str = "ext_";

/// Output key of the extended `format` keyword on arrays.
pub const EXT_FORMAT_KEYWORD: &str = "ext_format";

/// GraphQL scalar with a dedicated string format.
pub const DATE_TIME_SCALAR: &str = "DateTime";

/// Maps a GraphQL primitive scalar to its JSON Schema type.
pub fn primitive_json_type(name: &str) -> Option<&'static str> {
    match name {
        "Int" => Some("integer"),
        "Float" => Some("number"),
        "String" | "ID" => Some("string"),
        "Boolean" => Some("boolean"),
        _ => None,
    }
}

/// Validation keywords standard JSON Schema defines for a JSON type.
pub fn standard_keywords(json_type: &str) -> &'static [&'static str] {
    match json_type {
        "integer" | "number" => &["minimum", "maximum"],
        "string" => &["maxLength", "minLength", "pattern", "format"],
        "array" => &["maxItems", "minItems", "uniqueItems"],
        _ => &[],
    }
}

/// Keywords accepted for a JSON type that only the validator extension understands.
pub fn extended_keywords(json_type: &str) -> &'static [&'static str] {
    match json_type {
        "array" => &["format"],
        _ => &[],
    }
}

/// Resolves shorthand `@validate` argument names to their keyword.
pub fn canonical_keyword(name: &str) -> &str {
    match name {
        "min" => "minimum",
        "max" => "maximum",
        other => other,
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Options for the document transform.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// When true, sets `additionalProperties: false` on every object and input
    /// definition so payloads with unknown fields are rejected.
    pub strict: bool,
}

impl TransformOptions {
    /// Create options with strict mode disabled (default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode (additionalProperties: false on all object definitions).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
