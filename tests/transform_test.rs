//! Integration tests for SDL to JSON Schema conversion.

use graphql_json_schema::{
    convert_sdl, convert_sdl_with, parse_ast_json, parse_sdl, transform, LoadError,
    TransformOptions,
};
use serde_json::{json, Value};

const MOCK_SDL: &str = include_str!("data/mock_schema.graphql");
const MOCK_JSON: &str = include_str!("data/mock_schema.json");

fn definitions(sdl: &str) -> Value {
    convert_sdl(sdl).unwrap()["definitions"].clone()
}

mod full_document {
    use super::*;

    #[test]
    fn converts_mock_schema() {
        let expected: Value = serde_json::from_str(MOCK_JSON).unwrap();
        assert_eq!(convert_sdl(MOCK_SDL).unwrap(), expected);
    }

    #[test]
    fn conversion_is_byte_for_byte_deterministic() {
        let first = serde_json::to_string(&convert_sdl(MOCK_SDL).unwrap()).unwrap();
        let second = serde_json::to_string(&convert_sdl(MOCK_SDL).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn definitions_keep_document_order() {
        let converted = convert_sdl(MOCK_SDL).unwrap();
        let names: Vec<&str> = converted["definitions"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            names,
            vec!["Json", "Role", "Address", "User", "NewUser", "SearchResult"]
        );
    }

    #[test]
    fn json_ast_converts_like_sdl() {
        let ast = json!({
            "kind": "Document",
            "definitions": [{
                "kind": "ObjectTypeDefinition",
                "name": { "kind": "Name", "value": "Point" },
                "fields": [{
                    "kind": "FieldDefinition",
                    "name": { "kind": "Name", "value": "x" },
                    "type": {
                        "kind": "NonNullType",
                        "type": { "kind": "NamedType", "name": { "kind": "Name", "value": "Int" } }
                    },
                    "directives": [{
                        "kind": "Directive",
                        "name": { "kind": "Name", "value": "validate" },
                        "arguments": [{
                            "kind": "Argument",
                            "name": { "kind": "Name", "value": "min" },
                            "value": { "kind": "FloatValue", "value": "2.7" }
                        }]
                    }]
                }]
            }]
        });
        let document = parse_ast_json(&ast.to_string()).unwrap();
        assert_eq!(
            transform(&document),
            convert_sdl("type Point { x: Int! @validate(min: 2.7) }").unwrap()
        );
    }
}

mod empty_documents {
    use super::*;

    #[test]
    fn empty_string() {
        assert_eq!(convert_sdl("").unwrap(), json!({}));
    }

    #[test]
    fn only_comments_and_stubs() {
        let sdl = "# nothing here\ntype Query {}\nscalar Nothing { }\n";
        assert_eq!(convert_sdl(sdl).unwrap(), json!({}));
    }

    #[test]
    fn only_directive_declarations_keep_envelope() {
        let sdl = "directive @validate(format: String) on FIELD_DEFINITION";
        assert_eq!(
            convert_sdl(sdl).unwrap(),
            json!({
                "$schema": "http://json-schema.org/draft-04/schema#",
                "definitions": {}
            })
        );
    }

    #[test]
    fn only_reserved_format_enum_keeps_envelope() {
        let converted = convert_sdl("enum StringValidationFormat { email }").unwrap();
        assert_eq!(converted["definitions"], json!({}));
        assert!(converted.get("$schema").is_some());
    }
}

mod required_fields {
    use super::*;

    #[test]
    fn top_level_non_null_is_required() {
        let defs = definitions("type A { a: String!, b: [Int]!, c: B!, d: String }\ntype B { x: Int }");
        assert_eq!(defs["A"]["required"], json!(["a", "b", "c"]));
        for property in defs["A"]["properties"].as_object().unwrap().values() {
            assert!(property.get("required").is_none());
        }
    }

    #[test]
    fn non_null_list_elements_are_nullable_unions() {
        let defs = definitions("type A { names: [String!]! }");
        let names = &defs["A"]["properties"]["names"];
        assert_eq!(names["items"], json!({ "type": ["string", "null"] }));
        assert!(names["items"].get("required").is_none());
        assert_eq!(defs["A"]["required"], json!(["names"]));
    }

    #[test]
    fn no_required_key_without_non_null_fields() {
        let defs = definitions("type A { a: String }");
        assert!(defs["A"].get("required").is_none());
    }
}

mod validate_directive {
    use super::*;

    #[test]
    fn int_bounds_round_to_nearest() {
        let defs = definitions("type A { n: Int @validate(min: 2.7) }");
        assert_eq!(defs["A"]["properties"]["n"]["minimum"], json!(3));
    }

    #[test]
    fn float_bounds_are_kept() {
        let defs = definitions("type A { n: Float @validate(min: 2.7) }");
        assert_eq!(defs["A"]["properties"]["n"]["minimum"], json!(2.7));
    }

    #[test]
    fn string_numbers_are_cast() {
        let defs = definitions(r#"type A { s: String @validate(maxLength: "12") }"#);
        assert_eq!(defs["A"]["properties"]["s"]["maxLength"], json!(12));
    }

    #[test]
    fn list_format_is_extended() {
        let defs = definitions(r#"type dummy { intro: [String!] @validate(format: "email") }"#);
        let intro = &defs["dummy"]["properties"]["intro"];
        assert_eq!(intro["ext_format"], json!("email"));
        assert!(intro.get("format").is_none());
    }

    #[test]
    fn string_format_is_standard() {
        let defs = definitions(r#"type A { mail: String @validate(format: "email") }"#);
        assert_eq!(defs["A"]["properties"]["mail"]["format"], json!("email"));
    }

    #[test]
    fn date_time_format_can_be_overridden() {
        let defs = definitions(r#"type A { at: DateTime @validate(format: "date") }"#);
        assert_eq!(
            defs["A"]["properties"]["at"],
            json!({ "type": "string", "format": "date", "title": "at" })
        );
    }

    #[test]
    fn ref_fields_ignore_validate() {
        let defs = definitions("type A { b: B @validate(minLength: 1) }\ntype B { c: Int }");
        assert_eq!(
            defs["A"]["properties"]["b"],
            json!({ "$ref": "#/definitions/B", "title": "b" })
        );
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let defs = definitions(r#"type A { b: Int @deprecated(reason: "old") @auth(role: "x") }"#);
        assert_eq!(
            defs["A"]["properties"]["b"],
            json!({ "type": "integer", "title": "b" })
        );
    }

    #[test]
    fn later_directive_wins() {
        let defs = definitions("type A { b: Int @validate(maximum: 5) @validate(maximum: 9) }");
        assert_eq!(defs["A"]["properties"]["b"]["maximum"], json!(9));
    }

    #[test]
    fn input_fields_take_directives() {
        let defs = definitions("input A { b: String! @validate(minLength: 3) }");
        assert_eq!(defs["A"]["properties"]["b"]["minLength"], json!(3));
        assert_eq!(defs["A"]["input"], json!(true));
    }
}

mod definitions_map {
    use super::*;

    #[test]
    fn enum_order_preserved() {
        let defs = definitions("enum Letter { A B C }");
        assert_eq!(
            defs["Letter"],
            json!({ "title": "Letter", "type": "GRAPHQL_ENUM", "enum": ["A", "B", "C"] })
        );
    }

    #[test]
    fn duplicate_titles_last_wins() {
        let defs = definitions("type A { first: Int }\nenum A { SECOND }");
        assert_eq!(defs.as_object().unwrap().len(), 1);
        assert_eq!(defs["A"]["type"], json!("GRAPHQL_ENUM"));
    }

    #[test]
    fn reserved_format_definition_is_excluded() {
        let defs = definitions("enum StringValidationFormat { email }\ntype A { b: Int }");
        assert!(defs.get("StringValidationFormat").is_none());
        assert!(defs.get("A").is_some());
    }

    #[test]
    fn interfaces_project_like_objects() {
        let defs = definitions("interface Node { id: ID! }");
        assert_eq!(
            defs["Node"],
            json!({
                "title": "Node",
                "type": "object",
                "properties": { "id": { "type": "string", "title": "id" } },
                "required": ["id"]
            })
        );
    }

    #[test]
    fn strict_closes_objects() {
        let converted = convert_sdl_with(
            "type A { b: Int }\ninput C { d: Int }\nscalar E",
            &TransformOptions::new().strict(true),
        )
        .unwrap();
        let defs = &converted["definitions"];
        assert_eq!(defs["A"]["additionalProperties"], json!(false));
        assert_eq!(defs["C"]["additionalProperties"], json!(false));
        assert!(defs["E"].get("additionalProperties").is_none());
    }
}

mod errors {
    use super::*;

    #[test]
    fn invalid_sdl() {
        assert!(matches!(
            parse_sdl("type MyBrokenType { semicolon: String; }"),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn invalid_ast_json() {
        assert!(matches!(
            parse_ast_json("[1, 2, 3]"),
            Err(LoadError::InvalidJson { .. })
        ));
    }
}
