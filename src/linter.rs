//! SDL linting - static analysis of GraphQL schema files before conversion.
//!
//! Reports:
//! - SDL syntax errors
//! - References to types no definition provides (dangling `$ref`s)
//! - `@validate` arguments the transform will drop
//! - `format` names on list fields that no validator check knows
//! - Definitions that overwrite an earlier one of the same name

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ast::{Definition, FieldDefinition, SchemaDocument, TypeReference};
use crate::directive::{keyword_kind, KeywordKind};
use crate::extension::format_pattern;
use crate::loader::load_sdl;
use crate::mapper::{resolve, Context};
use crate::types::{
    canonical_keyword, primitive_json_type, DATE_TIME_SCALAR, RESERVED_FORMAT_DEFINITION,
    VALIDATE_DIRECTIVE,
};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON Pointer into the converted schema (e.g., "/definitions/User/properties/id")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .graphql and .gql files.
/// If `strict` is true, warnings are treated as errors.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_sdl_files(path);
    let results: Vec<FileResult> = files.iter().map(|file| lint_file(file, path)).collect();

    let count = |severity: Severity| {
        results
            .iter()
            .flat_map(|r| &r.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    };
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors,
        warnings,
        results,
    }
}

/// Lint a single SDL file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let display_file = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();
    let mut diagnostics = Vec::new();

    let document = match load_sdl(file) {
        Ok(document) => document,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E001".to_string(),
                file: file.to_path_buf(),
                path: "/".to_string(),
                message: format!("syntax error: {}", e),
            });
            return FileResult {
                file: display_file,
                status: FileStatus::Error,
                diagnostics,
            };
        }
    };

    diagnostics.extend(lint_document(&document, file));

    let status = if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        FileStatus::Error
    } else if diagnostics.is_empty() {
        FileStatus::Ok
    } else {
        FileStatus::Warning
    };

    FileResult {
        file: display_file,
        status,
        diagnostics,
    }
}

/// Run every document-level check.
pub fn lint_document(document: &SchemaDocument, file: &Path) -> Vec<Diagnostic> {
    let mut linter = DocumentLinter {
        file,
        diagnostics: Vec::new(),
    };

    let mut defined: HashSet<&str> = HashSet::new();
    for definition in schema_definitions(document) {
        if !defined.insert(definition.name()) {
            linter.push(
                Severity::Warning,
                "W003",
                definition_path(definition.name()),
                format!(
                    "duplicate definition \"{}\" overwrites an earlier one",
                    definition.name()
                ),
            );
        }
    }

    for definition in schema_definitions(document) {
        match definition {
            Definition::Object(object)
            | Definition::Interface(object)
            | Definition::InputObject(object) => {
                for field in &object.fields {
                    let path = format!(
                        "{}/properties/{}",
                        definition_path(&object.name),
                        escape_pointer(&field.name)
                    );
                    linter.check_reference(&field.ty, &defined, &path);
                    linter.check_directives(field, &path);
                }
            }
            Definition::Union(union) => {
                for (i, member) in union.types.iter().enumerate() {
                    let path = format!("{}/oneOf/{}", definition_path(&union.name), i);
                    linter.check_reference(member, &defined, &path);
                }
            }
            Definition::Enum(_) | Definition::Scalar(_) | Definition::Directive(_) => {}
        }
    }

    linter.diagnostics
}

struct DocumentLinter<'a> {
    file: &'a Path,
    diagnostics: Vec<Diagnostic>,
}

impl DocumentLinter<'_> {
    fn push(&mut self, severity: Severity, code: &str, path: String, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            code: code.to_string(),
            file: self.file.to_path_buf(),
            path,
            message,
        });
    }

    /// Every non-primitive type must be provided by a definition that survives
    /// the transform.
    fn check_reference(&mut self, ty: &TypeReference, defined: &HashSet<&str>, path: &str) {
        let name = ty.base_name();
        if name == DATE_TIME_SCALAR || primitive_json_type(name).is_some() || defined.contains(name)
        {
            return;
        }
        self.push(
            Severity::Error,
            "E002",
            path.to_string(),
            format!("reference to undefined type \"{}\"", name),
        );
    }

    fn check_directives(&mut self, field: &FieldDefinition, path: &str) {
        let fragment = resolve(&field.ty, Context::Field);
        let json_type = fragment.json_type();

        for directive in field
            .directives
            .iter()
            .filter(|d| d.name == VALIDATE_DIRECTIVE)
        {
            for argument in &directive.arguments {
                let keyword = canonical_keyword(&argument.name);
                let arg_path = format!("{}/@validate/{}", path, argument.name);

                match keyword_kind(keyword, json_type) {
                    None => self.push(
                        Severity::Warning,
                        "W001",
                        arg_path,
                        format!(
                            "@validate argument \"{}\" does not apply to {} and is dropped",
                            argument.name,
                            json_type.unwrap_or("a type reference")
                        ),
                    ),
                    Some(KeywordKind::Extended) if keyword == "format" => {
                        let value = argument.value.to_json();
                        let known = value.as_str().and_then(format_pattern).is_some();
                        if !known {
                            self.push(
                                Severity::Warning,
                                "W002",
                                arg_path,
                                format!(
                                    "unknown list format {}: every value will fail validation",
                                    value
                                ),
                            );
                        }
                    }
                    Some(_) => {}
                }
            }
        }
    }
}

fn schema_definitions(document: &SchemaDocument) -> impl Iterator<Item = &Definition> {
    document.definitions.iter().filter(|d| {
        !matches!(d, Definition::Directive(_)) && d.name() != RESERVED_FORMAT_DEFINITION
    })
}

fn definition_path(name: &str) -> String {
    format!("/definitions/{}", escape_pointer(name))
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Collect all SDL files in a path (file or directory).
fn collect_sdl_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if is_sdl_file(path) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if is_sdl_file(&path) {
            files.push(path);
        }
    }
}

fn is_sdl_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "graphql" || e == "gql")
        .unwrap_or(false)
}
