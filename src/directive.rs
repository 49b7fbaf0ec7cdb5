//! Directive processing - `@validate` arguments to JSON Schema keywords.

use serde_json::{Map, Value};
use tracing::trace;

use crate::ast::{number_value, Directive, Literal};
use crate::types::{
    canonical_keyword, extended_keywords, standard_keywords, EXTENDED_PREFIX, VALIDATE_DIRECTIVE,
};

/// How a keyword applies to a JSON type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    /// Emitted under its own name.
    Standard,
    /// Emitted under the `ext_` namespace.
    Extended,
}

/// Classify a (canonical) keyword for a resolved JSON type.
///
/// Returns `None` when the keyword does not apply, including when the type is
/// unknown (`$ref` fragments).
pub fn keyword_kind(keyword: &str, json_type: Option<&str>) -> Option<KeywordKind> {
    let json_type = json_type?;
    if standard_keywords(json_type).contains(&keyword) {
        Some(KeywordKind::Standard)
    } else if extended_keywords(json_type).contains(&keyword) {
        Some(KeywordKind::Extended)
    } else {
        None
    }
}

/// Translate one applied directive into validation keywords.
///
/// Only `@validate` contributes. Arguments that do not apply to `json_type`
/// are dropped without error.
pub fn apply(directive: &Directive, json_type: Option<&str>) -> Map<String, Value> {
    let mut keywords = Map::new();

    if directive.name != VALIDATE_DIRECTIVE {
        return keywords;
    }

    for argument in &directive.arguments {
        let keyword = canonical_keyword(&argument.name);
        let Some(kind) = keyword_kind(keyword, json_type) else {
            trace!(
                argument = %argument.name,
                json_type = json_type.unwrap_or("<ref>"),
                "dropping inapplicable @validate argument"
            );
            continue;
        };

        let value = match cast_value(keyword, &argument.value) {
            // Integer fields only take integral bounds.
            Cast::Number(n) if json_type == Some("integer") => number_value(round_half_up(n)),
            Cast::Number(n) => number_value(n),
            Cast::Other(value) => value,
        };

        let key = match kind {
            KeywordKind::Standard => keyword.to_string(),
            KeywordKind::Extended => format!("{}{}", EXTENDED_PREFIX, keyword),
        };
        keywords.insert(key, value);
    }

    keywords
}

enum Cast {
    Number(f64),
    Other(Value),
}

fn cast_value(keyword: &str, literal: &Literal) -> Cast {
    match keyword {
        "minimum" | "maximum" | "maxLength" | "minLength" | "maxItems" | "minItems"
        | "minProperties" | "maxProperties" => Cast::Number(literal.as_number().unwrap_or(f64::NAN)),
        "uniqueItems" => Cast::Other(Value::Bool(literal.is_truthy())),
        _ => Cast::Other(literal.to_json()),
    }
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(n: f64) -> f64 {
    (n + 0.5).floor()
}
