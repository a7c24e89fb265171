//! Declarative schema describing the shape of a merged config.

use crate::ValidationErrors;
use serde_json::{Map, Value};

/// Policy for keys that a schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFields {
    /// Report every undeclared key as an error.
    #[default]
    Forbid,
    /// Pass undeclared keys through untouched.
    Allow,
}

/// Expected type of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any value, including null.
    Any,
    Bool,
    /// An integral number.
    Integer,
    /// Any number, integral or not.
    Number,
    String,
    /// A sequence whose items all match the inner kind.
    List(Box<FieldKind>),
    /// A mapping with arbitrary keys whose values match the inner kind.
    Map(Box<FieldKind>),
    /// A nested mapping with its own declared fields.
    Object(ConfigSchema),
}

impl FieldKind {
    /// Short name used in validation messages.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Any => "any".to_string(),
            FieldKind::Bool => "bool".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::String => "string".to_string(),
            FieldKind::List(item) => format!("list of {}", item.describe()),
            FieldKind::Map(item) => format!("map of {}", item.describe()),
            FieldKind::Object(_) => "object".to_string(),
        }
    }
}

/// Declaration of a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    /// Whether the field must be present after merging.
    pub required: bool,
    /// Whether an explicit null is accepted.
    pub nullable: bool,
    /// Value inserted when the field is absent.
    pub default: Option<Value>,
}

impl FieldSpec {
    /// A required, non-nullable field of the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            nullable: false,
            default: None,
        }
    }

    pub fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Bool)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn list(item: FieldKind) -> Self {
        Self::new(FieldKind::List(Box::new(item)))
    }

    pub fn map(item: FieldKind) -> Self {
        Self::new(FieldKind::Map(Box::new(item)))
    }

    pub fn object(schema: ConfigSchema) -> Self {
        Self::new(FieldKind::Object(schema))
    }

    /// Allow the field to be absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Accept an explicit null.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Fill the field with `value` when no layer sets it.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered set of field declarations plus a strictness policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    pub(crate) fields: Vec<(String, FieldSpec)>,
    pub(crate) unknown_fields: UnknownFields,
}

impl ConfigSchema {
    /// An empty schema that forbids unknown fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a name replaces the earlier spec.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = spec,
            None => self.fields.push((name, spec)),
        }
        self
    }

    pub fn unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Look up a declared field.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    /// Validate a merged mapping, returning it with defaults filled in.
    ///
    /// Every failure is collected; the mapping is only returned if there
    /// were none.
    pub fn validate(&self, value: Map<String, Value>) -> Result<Map<String, Value>, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let validated = crate::loader::schema::validate_object(self, value, "", &mut errors);
        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}
