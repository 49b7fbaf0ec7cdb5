//! Validator extension - the `ext_format` keyword.
//!
//! Arrays of strings can carry a per-element format check that standard JSON
//! Schema cannot express. The transform emits it as `ext_format`; this module
//! teaches a validator what the keyword means.
//!
//! Registration goes through the [`KeywordRegistry`] capability so any
//! validator that accepts custom keywords can be extended. An implementation
//! for [`jsonschema::ValidationOptions`] is provided.

use std::sync::OnceLock;

use jsonschema::paths::{LazyLocation, Location};
use jsonschema::{Keyword, ValidationError};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{json_type_name, EXT_FORMAT_KEYWORD};

/// Checks instance data against a keyword's schema value.
pub type ValidateFn = fn(schema_value: &Value, data: &Value) -> bool;

/// A custom keyword as handed to a registry.
#[derive(Debug, Clone, Copy)]
pub struct CustomKeyword {
    pub validate: ValidateFn,
    /// Whether the keyword attaches its own error details. A [`ValidateFn`]
    /// only answers pass or fail, so this is `false` for every keyword here
    /// and registries always describe failures themselves.
    pub errors: bool,
}

/// Anything custom validation keywords can be registered on.
pub trait KeywordRegistry {
    /// Whether this registry accepts custom keywords at all.
    fn supports_keywords(&self) -> bool {
        true
    }

    fn register_keyword(&mut self, name: &str, keyword: CustomKeyword);
}

/// Register the extended keywords on `registry`.
///
/// Does nothing and returns `false` when the registry does not support custom
/// keywords. Registering twice is the caller's concern.
pub fn extend<R: KeywordRegistry + ?Sized>(registry: &mut R) -> bool {
    if !registry.supports_keywords() {
        debug!("validator does not accept custom keywords; not extending");
        return false;
    }
    registry.register_keyword(
        EXT_FORMAT_KEYWORD,
        CustomKeyword {
            validate: validate_ext_format,
            errors: false,
        },
    );
    true
}

const FORMAT_PATTERNS: &[(&str, &str)] = &[
    (
        "email",
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    ),
    ("uri", r"^[A-Za-z][A-Za-z0-9+.-]*:\S*$"),
    ("url", r"^https?://[^\s/$.?#][^\s]*$"),
    ("date", r"^\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])$"),
    (
        "date-time",
        r"^\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])[Tt ](?:[01]\d|2[0-3]):[0-5]\d:(?:[0-5]\d|60)(?:\.\d+)?(?:[Zz]|[+-](?:[01]\d|2[0-3]):[0-5]\d)$",
    ),
    (
        "time",
        r"^(?:[01]\d|2[0-3]):[0-5]\d:(?:[0-5]\d|60)(?:\.\d+)?(?:[Zz]|[+-](?:[01]\d|2[0-3]):[0-5]\d)?$",
    ),
    (
        "uuid",
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    ),
    (
        "ipv4",
        r"^(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)$",
    ),
    (
        "hostname",
        r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    ),
    ("phone", r"^\+?[0-9][0-9 ().-]{5,}$"),
];

fn format_table() -> &'static [(&'static str, Regex)] {
    static TABLE: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FORMAT_PATTERNS
            .iter()
            .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (*name, re)))
            .collect()
    })
}

/// Look up the pattern of a named format.
pub fn format_pattern(name: &str) -> Option<&'static Regex> {
    format_table()
        .iter()
        .find(|(format, _)| *format == name)
        .map(|(_, re)| re)
}

/// Names of every known format, in table order.
pub fn format_names() -> impl Iterator<Item = &'static str> {
    FORMAT_PATTERNS.iter().map(|(name, _)| *name)
}

/// `ext_format` semantics: every element of the array is a string matching
/// the named format.
///
/// An unknown format name fails every check. Non-array data fails.
pub fn validate_ext_format(schema_value: &Value, data: &Value) -> bool {
    // TODO: surface unknown format names as a dedicated error instead of a plain failure.
    let Some(pattern) = schema_value.as_str().and_then(format_pattern) else {
        debug!(format = %schema_value, "unknown ext_format name; check fails");
        return false;
    };
    let Some(items) = data.as_array() else {
        return false;
    };
    items
        .iter()
        .all(|item| item.as_str().map_or(false, |s| pattern.is_match(s)))
}

// --- jsonschema adapter ---

impl KeywordRegistry for jsonschema::ValidationOptions {
    fn register_keyword(&mut self, name: &str, keyword: CustomKeyword) {
        let keyword_name = name.to_string();
        self.with_keyword(
            name,
            move |_parent: &Map<String, Value>, value: &Value, _path: Location| {
                Ok(Box::new(RegisteredKeyword {
                    name: keyword_name.clone(),
                    schema_value: value.clone(),
                    keyword,
                }) as Box<dyn Keyword>)
            },
        );
    }
}

struct RegisteredKeyword {
    name: String,
    schema_value: Value,
    keyword: CustomKeyword,
}

impl RegisteredKeyword {
    fn message(&self) -> String {
        match self.schema_value.as_str() {
            Some(format) if self.name == EXT_FORMAT_KEYWORD => {
                format!("not every element is a string in \"{}\" format", format)
            }
            _ => format!("{} check failed for {}", self.name, self.schema_value),
        }
    }
}

impl Keyword for RegisteredKeyword {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        location: &LazyLocation,
    ) -> Result<(), ValidationError<'i>> {
        if self.is_valid(instance) {
            return Ok(());
        }
        let message = if !instance.is_array() {
            format!(
                "{} expects an array of strings, got {}",
                self.name,
                json_type_name(instance)
            )
        } else {
            self.message()
        };
        Err(ValidationError::custom(
            Location::new(),
            location.into(),
            instance,
            message,
        ))
    }

    fn is_valid(&self, instance: &Value) -> bool {
        (self.keyword.validate)(&self.schema_value, instance)
    }
}
