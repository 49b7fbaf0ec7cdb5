//! GraphQL SDL to JSON Schema
//!
//! Converts a GraphQL Schema Definition Language document into a JSON Schema
//! (draft-04) envelope, with `@validate` field directives turned into
//! validation keywords.
//!
//! # Example
//!
//! ```
//! use graphql_json_schema::convert_sdl;
//! use serde_json::json;
//!
//! let schema = convert_sdl(r#"
//!     type User {
//!         id: ID!
//!         age: Int @validate(min: 2.7)
//!     }
//! "#).unwrap();
//!
//! assert_eq!(schema["$schema"], "http://json-schema.org/draft-04/schema#");
//! assert_eq!(schema["definitions"]["User"]["required"], json!(["id"]));
//! assert_eq!(schema["definitions"]["User"]["properties"]["age"]["minimum"], 3);
//! ```
//!
//! # Type Mapping
//!
//! | GraphQL | JSON Schema |
//! |---------|-------------|
//! | `Int` / `Float` | `{"type": "integer"}` / `{"type": "number"}` |
//! | `String` / `ID` / `Boolean` | `{"type": "string"}` / `{"type": "boolean"}` |
//! | `DateTime` | `{"type": "string", "format": "date-time"}` |
//! | `[T]` | `{"type": "array", "items": ...}`, primitive items admit `null` |
//! | `T!` | field listed in the definition's `required` |
//! | other named types | `{"$ref": "#/definitions/T"}` |
//!
//! Enums, unions, and custom scalars carry the `GRAPHQL_ENUM`, `GRAPHQL_UNION`,
//! and `GRAPHQL_SCALAR` type sentinels; input objects carry `"input": true`.
//!
//! # Extended Keywords
//!
//! `@validate(format: "email")` on a list field emits `ext_format`, which only
//! validators extended with [`extend`] understand. [`validate`] registers it
//! automatically.

mod ast;
mod builder;
mod directive;
mod error;
mod extension;
mod linter;
mod loader;
mod mapper;
mod transform;
mod types;
mod validator;

pub use ast::{
    Argument, Definition, Directive, DirectiveDeclaration, EnumDefinition, FieldDefinition,
    Literal, ObjectDefinition, ScalarDefinition, SchemaDocument, TypeReference, UnionDefinition,
};
pub use builder::{build, project, ProjectedField};
pub use directive::{apply, keyword_kind, KeywordKind};
pub use error::{LoadError, SchemaError, ValidateError};
pub use extension::{
    extend, format_names, format_pattern, validate_ext_format, CustomKeyword, KeywordRegistry,
    ValidateFn,
};
pub use linter::{
    lint, lint_document, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity,
};
pub use loader::{
    convert_sdl, convert_sdl_with, is_url, load_ast, load_json, load_sdl, load_sdl_auto,
    parse_ast_json, parse_sdl, preprocess_sdl,
};
pub use mapper::{resolve, Context, TypeFragment};
pub use transform::{transform, transform_with};
pub use types::{
    TransformOptions, DRAFT_04, EXT_FORMAT_KEYWORD, GRAPHQL_ENUM, GRAPHQL_SCALAR, GRAPHQL_UNION,
};
pub use validator::{lower_definitions, validate, validate_against_schema, ValidateOptions};

#[cfg(feature = "remote")]
pub use loader::load_sdl_url;
