//! Parsed GraphQL SDL document model.
//!
//! The transform only ever reads these types. They are produced either by the
//! SDL front end in [`crate::loader`] or by deserializing the JSON AST that
//! GraphQL-js style parsers emit (`{"kind": "Document", "definitions": [...]}`).

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// An ordered sequence of top-level definitions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

impl SchemaDocument {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// One top-level definition, discriminated by its `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum Definition {
    #[serde(rename = "ObjectTypeDefinition")]
    Object(ObjectDefinition),
    #[serde(rename = "InterfaceTypeDefinition")]
    Interface(ObjectDefinition),
    #[serde(rename = "InputObjectTypeDefinition")]
    InputObject(ObjectDefinition),
    #[serde(rename = "EnumTypeDefinition")]
    Enum(EnumDefinition),
    #[serde(rename = "UnionTypeDefinition")]
    Union(UnionDefinition),
    #[serde(rename = "ScalarTypeDefinition")]
    Scalar(ScalarDefinition),
    #[serde(rename = "DirectiveDefinition")]
    Directive(DirectiveDeclaration),
}

impl Definition {
    /// The declared name of the definition.
    pub fn name(&self) -> &str {
        match self {
            Definition::Object(d) | Definition::Interface(d) | Definition::InputObject(d) => {
                &d.name
            }
            Definition::Enum(d) => &d.name,
            Definition::Union(d) => &d.name,
            Definition::Scalar(d) => &d.name,
            Definition::Directive(d) => &d.name,
        }
    }

    /// Human readable kind, used in diagnostics and log events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Definition::Object(_) => "object",
            Definition::Interface(_) => "interface",
            Definition::InputObject(_) => "input",
            Definition::Enum(_) => "enum",
            Definition::Union(_) => "union",
            Definition::Scalar(_) => "scalar",
            Definition::Directive(_) => "directive",
        }
    }
}

/// Object, interface, and input object definitions share this shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectDefinition {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumDefinition {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
    #[serde(default, deserialize_with = "named_nodes")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnionDefinition {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScalarDefinition {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
}

/// A `directive @name(...) on ...` declaration. Only its name is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectiveDeclaration {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
}

/// A field of an object or interface, or an input value of an input object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDefinition {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            ty,
            directives: Vec::new(),
        }
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

/// A possibly wrapped reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "TypeNode")]
pub enum TypeReference {
    Named(String),
    List(Box<TypeReference>),
    NonNull(Box<TypeReference>),
}

impl TypeReference {
    pub fn named(name: impl Into<String>) -> Self {
        TypeReference::Named(name.into())
    }

    pub fn list(inner: TypeReference) -> Self {
        TypeReference::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeReference) -> Self {
        TypeReference::NonNull(Box::new(inner))
    }

    /// The innermost named type, with every wrapper removed.
    pub fn base_name(&self) -> &str {
        match self {
            TypeReference::Named(name) => name,
            TypeReference::List(inner) | TypeReference::NonNull(inner) => inner.base_name(),
        }
    }
}

/// An applied directive, `@name(arg: value, ...)`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Directive {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: Literal) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Argument {
    #[serde(deserialize_with = "name_value")]
    pub name: String,
    pub value: Literal,
}

/// A literal argument value.
///
/// Numeric literals keep their source text, as GraphQL parsers do.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ValueNode")]
pub enum Literal {
    Int(String),
    Float(String),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<Literal>),
    Object(Vec<(String, Literal)>),
    Variable(String),
}

impl Literal {
    /// Numeric reading of the literal. Strings are parsed after trimming and
    /// the empty string reads as zero; `None` means "not a number".
    ///
    /// Only scalar literals carry a value to read: `null`, lists, objects and
    /// variables are never numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Int(raw) | Literal::Float(raw) => raw.trim().parse().ok(),
            Literal::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse().ok()
                }
            }
            Literal::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Literal::Null
            | Literal::Enum(_)
            | Literal::List(_)
            | Literal::Object(_)
            | Literal::Variable(_) => None,
        }
    }

    /// Truthiness of the literal's scalar value.
    ///
    /// Enum names are non-empty strings. Lists, objects, variables and `null`
    /// carry no scalar value and are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::Boolean(b) => *b,
            Literal::String(s) | Literal::Enum(s) => !s.is_empty(),
            Literal::Int(_) | Literal::Float(_) => {
                self.as_number().map_or(false, |n| n != 0.0 && !n.is_nan())
            }
            Literal::Null | Literal::List(_) | Literal::Object(_) | Literal::Variable(_) => false,
        }
    }

    /// The literal as a JSON value, unchanged in meaning.
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Int(_) | Literal::Float(_) => self
                .as_number()
                .map(number_value)
                .unwrap_or(Value::Null),
            Literal::String(s) | Literal::Enum(s) | Literal::Variable(s) => {
                Value::String(s.clone())
            }
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
            Literal::List(items) => Value::Array(items.iter().map(Literal::to_json).collect()),
            Literal::Object(fields) => {
                let mut map = Map::new();
                for (name, value) in fields {
                    map.insert(name.clone(), value.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

/// Converts a float to JSON, keeping integral values as JSON integers.
///
/// Non-finite values have no JSON form and become `null`.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

// --- JSON AST wire shapes ---

#[derive(Deserialize)]
struct NameNode {
    value: String,
}

#[derive(Deserialize)]
struct NamedNode {
    #[serde(deserialize_with = "name_value")]
    name: String,
}

fn name_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    NameNode::deserialize(deserializer).map(|node| node.value)
}

fn named_nodes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<NamedNode>::deserialize(deserializer)
        .map(|nodes| nodes.into_iter().map(|node| node.name).collect())
}

#[derive(Deserialize)]
#[serde(tag = "kind")]
enum TypeNode {
    NamedType {
        #[serde(deserialize_with = "name_value")]
        name: String,
    },
    ListType {
        #[serde(rename = "type")]
        inner: Box<TypeReference>,
    },
    NonNullType {
        #[serde(rename = "type")]
        inner: Box<TypeReference>,
    },
}

impl From<TypeNode> for TypeReference {
    fn from(node: TypeNode) -> Self {
        match node {
            TypeNode::NamedType { name } => TypeReference::Named(name),
            TypeNode::ListType { inner } => TypeReference::List(inner),
            TypeNode::NonNullType { inner } => TypeReference::NonNull(inner),
        }
    }
}

#[derive(Deserialize)]
struct ObjectFieldNode {
    #[serde(deserialize_with = "name_value")]
    name: String,
    value: Literal,
}

#[derive(Deserialize)]
#[serde(tag = "kind")]
enum ValueNode {
    IntValue {
        value: String,
    },
    FloatValue {
        value: String,
    },
    StringValue {
        value: String,
    },
    BooleanValue {
        value: bool,
    },
    NullValue {},
    EnumValue {
        value: String,
    },
    ListValue {
        #[serde(default)]
        values: Vec<Literal>,
    },
    ObjectValue {
        #[serde(default)]
        fields: Vec<ObjectFieldNode>,
    },
    Variable {
        #[serde(deserialize_with = "name_value")]
        name: String,
    },
}

impl From<ValueNode> for Literal {
    fn from(node: ValueNode) -> Self {
        match node {
            ValueNode::IntValue { value } => Literal::Int(value),
            ValueNode::FloatValue { value } => Literal::Float(value),
            ValueNode::StringValue { value } => Literal::String(value),
            ValueNode::BooleanValue { value } => Literal::Boolean(value),
            ValueNode::NullValue {} => Literal::Null,
            ValueNode::EnumValue { value } => Literal::Enum(value),
            ValueNode::ListValue { values } => Literal::List(values),
            ValueNode::ObjectValue { fields } => Literal::Object(
                fields
                    .into_iter()
                    .map(|field| (field.name, field.value))
                    .collect(),
            ),
            ValueNode::Variable { name } => Literal::Variable(name),
        }
    }
}
