//! SDL loading from files, strings, and HTTP URLs.
//!
//! Text is preprocessed, parsed with `graphql-parser`, and converted into the
//! [`crate::ast`] model. JSON ASTs produced by GraphQL-js style tooling are
//! accepted as well.

use std::path::Path;
use std::sync::OnceLock;

use graphql_parser::schema as gql;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::ast::{
    Argument, Definition, Directive, DirectiveDeclaration, EnumDefinition, FieldDefinition,
    Literal, ObjectDefinition, ScalarDefinition, SchemaDocument, TypeReference, UnionDefinition,
};
use crate::error::LoadError;
use crate::transform::transform_with;
use crate::types::TransformOptions;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Clean SDL text before parsing.
///
/// Removes `#` comments outside string literals and empty `type`, `enum`,
/// `input`, and `scalar` stubs (`type Foo { }`), then trims.
pub fn preprocess_sdl(text: &str) -> String {
    static EMPTY_STUB: OnceLock<Option<Regex>> = OnceLock::new();
    let without_comments = strip_comments(text);
    let cleaned = match EMPTY_STUB
        .get_or_init(|| Regex::new(r"(?i)(?:type|enum|input|scalar)\s+\S+\s+\{\s*\}").ok())
    {
        Some(stub) => stub.replace_all(&without_comments, "").into_owned(),
        None => without_comments,
    };
    cleaned.trim().to_string()
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut in_string = false;
    let mut in_block_string = false;

    while let Some(c) = rest.chars().next() {
        if in_block_string {
            if rest.starts_with("\\\"\"\"") {
                out.push_str("\\\"\"\"");
                rest = &rest[4..];
                continue;
            }
            if rest.starts_with("\"\"\"") {
                in_block_string = false;
                out.push_str("\"\"\"");
                rest = &rest[3..];
                continue;
            }
        } else if in_string {
            if c == '\\' {
                let escaped = rest[1..].chars().next().map_or(0, char::len_utf8);
                let len = 1 + escaped;
                out.push_str(&rest[..len]);
                rest = &rest[len..];
                continue;
            }
            if c == '"' || c == '\n' {
                in_string = false;
            }
        } else if rest.starts_with("\"\"\"") {
            in_block_string = true;
            out.push_str("\"\"\"");
            rest = &rest[3..];
            continue;
        } else if c == '"' {
            in_string = true;
        } else if c == '#' {
            let end = rest.find('\n').unwrap_or(rest.len());
            rest = &rest[end..];
            continue;
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Parse SDL text into a document.
///
/// Text that is empty after preprocessing yields an empty document.
///
/// # Errors
///
/// Returns `LoadError::Parse` for invalid SDL, or `LoadError::Unsupported`
/// for type extensions.
pub fn parse_sdl(text: &str) -> Result<SchemaDocument, LoadError> {
    let cleaned = preprocess_sdl(text);
    if cleaned.is_empty() {
        return Ok(SchemaDocument::default());
    }

    let parsed = gql::parse_schema::<String>(&cleaned).map_err(|e| LoadError::Parse {
        message: e.to_string(),
    })?;

    let mut definitions = Vec::new();
    for definition in parsed.definitions {
        if let Some(converted) = convert_definition(definition)? {
            definitions.push(converted);
        }
    }
    Ok(SchemaDocument::new(definitions))
}

/// Parse and transform SDL text in one step.
///
/// # Errors
///
/// Returns `LoadError` if the SDL cannot be parsed.
pub fn convert_sdl(text: &str) -> Result<Value, LoadError> {
    convert_sdl_with(text, &TransformOptions::default())
}

/// [`convert_sdl`] with explicit transform options.
pub fn convert_sdl_with(text: &str, options: &TransformOptions) -> Result<Value, LoadError> {
    let document = parse_sdl(text)?;
    Ok(transform_with(&document, options))
}

/// Load and parse an SDL file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::Parse` if the file isn't valid SDL.
pub fn load_sdl(path: &Path) -> Result<SchemaDocument, LoadError> {
    parse_sdl(&read_file(path)?)
}

/// Load and parse SDL served over HTTP/HTTPS.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails,
/// or `LoadError::Parse` if the response isn't valid SDL.
#[cfg(feature = "remote")]
pub fn load_sdl_url(url: &str) -> Result<SchemaDocument, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let text = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(network_error)?;

    parse_sdl(&text)
}

/// Load SDL from a file path or URL (auto-detected).
///
/// # Errors
///
/// Returns `LoadError` if loading fails.
pub fn load_sdl_auto(source: &str) -> Result<SchemaDocument, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_sdl_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_sdl(Path::new(source))
    }
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Parse a JSON-encoded GraphQL AST.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the text is not a document AST.
pub fn parse_ast_json(content: &str) -> Result<SchemaDocument, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a JSON-encoded GraphQL AST from a file.
pub fn load_ast(path: &Path) -> Result<SchemaDocument, LoadError> {
    parse_ast_json(&read_file(path)?)
}

/// Load a JSON document (payload) from a file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

// --- graphql-parser conversion ---

fn convert_definition(
    definition: gql::Definition<'_, String>,
) -> Result<Option<Definition>, LoadError> {
    match definition {
        gql::Definition::SchemaDefinition(_) => {
            debug!("skipping schema definition");
            Ok(None)
        }
        gql::Definition::TypeExtension(extension) => Err(LoadError::Unsupported {
            message: format!("type extension `{}`", extension_name(&extension)),
        }),
        gql::Definition::DirectiveDefinition(directive) => {
            Ok(Some(Definition::Directive(DirectiveDeclaration {
                name: directive.name,
            })))
        }
        gql::Definition::TypeDefinition(type_definition) => {
            Ok(Some(convert_type_definition(type_definition)))
        }
    }
}

fn convert_type_definition(definition: gql::TypeDefinition<'_, String>) -> Definition {
    match definition {
        gql::TypeDefinition::Scalar(scalar) => Definition::Scalar(ScalarDefinition {
            name: scalar.name,
        }),
        gql::TypeDefinition::Object(object) => Definition::Object(ObjectDefinition {
            name: object.name,
            fields: object.fields.into_iter().map(convert_field).collect(),
        }),
        gql::TypeDefinition::Interface(interface) => Definition::Interface(ObjectDefinition {
            name: interface.name,
            fields: interface.fields.into_iter().map(convert_field).collect(),
        }),
        gql::TypeDefinition::InputObject(input) => Definition::InputObject(ObjectDefinition {
            name: input.name,
            fields: input.fields.into_iter().map(convert_input_value).collect(),
        }),
        gql::TypeDefinition::Union(union) => Definition::Union(UnionDefinition {
            name: union.name,
            types: union.types.into_iter().map(TypeReference::Named).collect(),
        }),
        gql::TypeDefinition::Enum(enumeration) => Definition::Enum(EnumDefinition {
            name: enumeration.name,
            values: enumeration
                .values
                .into_iter()
                .map(|value| value.name)
                .collect(),
        }),
    }
}

fn extension_name<'a>(extension: &'a gql::TypeExtension<'_, String>) -> &'a str {
    match extension {
        gql::TypeExtension::Scalar(e) => &e.name,
        gql::TypeExtension::Object(e) => &e.name,
        gql::TypeExtension::Interface(e) => &e.name,
        gql::TypeExtension::Union(e) => &e.name,
        gql::TypeExtension::Enum(e) => &e.name,
        gql::TypeExtension::InputObject(e) => &e.name,
    }
}

fn convert_field(field: gql::Field<'_, String>) -> FieldDefinition {
    FieldDefinition {
        name: field.name,
        ty: convert_type(field.field_type),
        directives: field.directives.into_iter().map(convert_directive).collect(),
    }
}

fn convert_input_value(value: gql::InputValue<'_, String>) -> FieldDefinition {
    FieldDefinition {
        name: value.name,
        ty: convert_type(value.value_type),
        directives: value.directives.into_iter().map(convert_directive).collect(),
    }
}

fn convert_type(ty: gql::Type<'_, String>) -> TypeReference {
    match ty {
        gql::Type::NamedType(name) => TypeReference::Named(name),
        gql::Type::ListType(inner) => TypeReference::list(convert_type(*inner)),
        gql::Type::NonNullType(inner) => TypeReference::non_null(convert_type(*inner)),
    }
}

fn convert_directive(directive: gql::Directive<'_, String>) -> Directive {
    Directive {
        name: directive.name,
        arguments: directive
            .arguments
            .into_iter()
            .map(|(name, value)| Argument {
                name,
                value: convert_value(value),
            })
            .collect(),
    }
}

fn convert_value(value: gql::Value<'_, String>) -> Literal {
    match value {
        gql::Value::Variable(name) => Literal::Variable(name),
        gql::Value::Int(number) => Literal::Int(
            number
                .as_i64()
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ),
        gql::Value::Float(f) => Literal::Float(f.to_string()),
        gql::Value::String(s) => Literal::String(s),
        gql::Value::Boolean(b) => Literal::Boolean(b),
        gql::Value::Null => Literal::Null,
        gql::Value::Enum(name) => Literal::Enum(name),
        gql::Value::List(items) => Literal::List(items.into_iter().map(convert_value).collect()),
        gql::Value::Object(fields) => Literal::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name, convert_value(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn preprocess_strips_comments() {
        let sdl = "# leading\ntype A {\n  name: String # trailing\n}\n";
        assert_eq!(preprocess_sdl(sdl), "type A {\n  name: String \n}");
    }

    #[test]
    fn preprocess_keeps_hash_inside_strings() {
        let sdl = r#"type A { colour: String @validate(pattern: "^#[0-9a-f]{6}$") }"#;
        assert_eq!(preprocess_sdl(sdl), sdl);
    }

    #[test]
    fn preprocess_keeps_hash_inside_block_strings() {
        let sdl = "\"\"\"\nUses # inside\n\"\"\"\ntype A { b: Int }";
        assert_eq!(preprocess_sdl(sdl), sdl);
    }

    #[test]
    fn preprocess_removes_empty_stubs() {
        let sdl = "type Empty { }\nenum Nothing {}\ntype A { b: Int }";
        assert_eq!(preprocess_sdl(sdl), "type A { b: Int }");
    }

    #[test]
    fn parse_empty_sdl() {
        assert!(parse_sdl("  # only a comment\n").unwrap().is_empty());
        assert_eq!(convert_sdl("").unwrap(), json!({}));
    }

    #[test]
    fn parse_all_definition_kinds() {
        let sdl = r#"
            directive @validate(format: String) on FIELD_DEFINITION
            scalar Json
            enum Role { ADMIN GUEST }
            interface Node { id: ID! }
            type User implements Node { id: ID! tags: [String!] @validate(maxItems: 3) }
            input NewUser { name: String! }
            union Search = User | Role
        "#;
        let document = parse_sdl(sdl).unwrap();
        let kinds: Vec<&str> = document
            .definitions
            .iter()
            .map(Definition::kind_name)
            .collect();
        assert_eq!(
            kinds,
            vec!["directive", "scalar", "enum", "interface", "object", "input", "union"]
        );

        let Definition::Object(user) = &document.definitions[4] else {
            panic!("expected object");
        };
        assert_eq!(
            user.fields[1].ty,
            TypeReference::list(TypeReference::non_null(TypeReference::named("String")))
        );
        assert_eq!(
            user.fields[1].directives[0],
            Directive::new("validate").arg("maxItems", Literal::Int("3".into()))
        );
    }

    #[test]
    fn parse_literal_kinds() {
        let sdl = r#"type A { b: Int @x(i: 1, f: 2.5, s: "s", t: true, n: null, e: RED, l: [1], o: {k: 1}) }"#;
        let document = parse_sdl(sdl).unwrap();
        let Definition::Object(a) = &document.definitions[0] else {
            panic!("expected object");
        };
        let values: Vec<&Literal> = a.fields[0].directives[0]
            .arguments
            .iter()
            .map(|arg| &arg.value)
            .collect();
        assert_eq!(values[0], &Literal::Int("1".into()));
        assert_eq!(values[1].as_number(), Some(2.5));
        assert_eq!(values[2], &Literal::String("s".into()));
        assert_eq!(values[3], &Literal::Boolean(true));
        assert_eq!(values[4], &Literal::Null);
        assert_eq!(values[5], &Literal::Enum("RED".into()));
        assert_eq!(values[6], &Literal::List(vec![Literal::Int("1".into())]));
        assert_eq!(
            values[7],
            &Literal::Object(vec![("k".into(), Literal::Int("1".into()))])
        );
    }

    #[test]
    fn schema_definition_is_skipped() {
        let sdl = "schema { query: Query }\ntype Query { ok: Boolean }";
        let document = parse_sdl(sdl).unwrap();
        assert_eq!(document.definitions.len(), 1);
        assert_eq!(document.definitions[0].name(), "Query");
    }

    #[test]
    fn type_extension_is_unsupported() {
        let result = parse_sdl("type A { b: Int }\nextend type A { c: Int }");
        assert!(matches!(result, Err(LoadError::Unsupported { message }) if message.contains('A')));
    }

    #[test]
    fn invalid_sdl_is_parse_error() {
        let result = parse_sdl("type Broken { semicolon: String; }");
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn load_sdl_missing_file() {
        let result = load_sdl(Path::new("/definitely/not/here.graphql"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_sdl_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "type A {{ b: Int! }}").unwrap();
        let document = load_sdl(file.path()).unwrap();
        assert_eq!(document.definitions[0].name(), "A");
    }

    #[test]
    fn load_json_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json }}").unwrap();
        assert!(matches!(
            load_json(file.path()),
            Err(LoadError::InvalidJson { .. })
        ));
    }

    #[test]
    fn parse_ast_json_document() {
        let document = parse_ast_json(
            r#"{"kind":"Document","definitions":[{"kind":"ScalarTypeDefinition","name":{"kind":"Name","value":"Json"}}]}"#,
        )
        .unwrap();
        assert_eq!(document.definitions[0].name(), "Json");
        assert!(matches!(
            parse_ast_json(r#"{"definitions":[{"kind":"Bogus"}]}"#),
            Err(LoadError::InvalidJson { .. })
        ));
    }

    #[test]
    fn is_url_detection() {
        assert!(is_url("https://example.com/schema.graphql"));
        assert!(is_url("http://localhost:4000/sdl"));
        assert!(!is_url("schema.graphql"));
    }
}
