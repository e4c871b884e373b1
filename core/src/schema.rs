//! Field schema for resource definitions.
//!
//! # Design
//! Definitions are plain `'static` data so generated resources can be
//! declared as constants. Root keys (singular and plural) and the primary key
//! are explicit fields of the definition rather than derived from type names.

use std::fmt;

use crate::error::ResourceError;
use crate::resources;

/// Semantic type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// RFC 3339 timestamp with offset.
    Timestamp,
    /// A nested resource, named by its definition.
    Object(&'static str),
    List(&'static FieldType),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Timestamp => write!(f, "timestamp"),
            FieldType::Object(name) => write!(f, "{name}"),
            FieldType::List(inner) => write!(f, "list of {inner}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    /// Server-assigned; never sent in request bodies.
    pub read_only: bool,
}

impl FieldDef {
    pub const fn writable(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            read_only: false,
        }
    }

    pub const fn read_only(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            read_only: true,
        }
    }
}

/// Operations a resource may expose. Each maps to one HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    All,
    Find,
    Create,
    Update,
    Delete,
    Count,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::All => "all",
            Operation::Find => "find",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Count => "count",
        }
    }
}

/// A path template registered for one operation, e.g.
/// `products/<product_id>/resource_feedback.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathDef {
    pub operation: Operation,
    pub template: &'static str,
}

impl PathDef {
    pub const fn new(operation: Operation, template: &'static str) -> Self {
        Self {
            operation,
            template,
        }
    }
}

/// Static description of a resource type.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceDef {
    pub name: &'static str,
    /// Root key for single-object payloads.
    pub singular: &'static str,
    /// Root key for list payloads.
    pub plural: &'static str,
    /// Field whose presence turns `save` into an update. `None` for
    /// resources that are only ever created.
    pub primary_key: Option<&'static str>,
    pub fields: &'static [FieldDef],
    pub paths: &'static [PathDef],
}

impl ResourceDef {
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn writable_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(|f| !f.read_only)
    }

    /// Templates declared for `operation`, in declaration order.
    pub fn paths_for(&self, operation: Operation) -> impl Iterator<Item = &'static PathDef> {
        self.paths.iter().filter(move |p| p.operation == operation)
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.paths_for(operation).next().is_some()
    }
}

/// Look up a built-in resource definition by name.
pub fn lookup(name: &str) -> Result<&'static ResourceDef, ResourceError> {
    resources::ALL
        .iter()
        .copied()
        .find(|def| def.name == name)
        .ok_or_else(|| ResourceError::UnknownResource(name.to_string()))
}
