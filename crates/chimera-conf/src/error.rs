//! Error types for config loading and validation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while manifesting a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A declared base file does not exist.
    #[error("base config file not found: {}", path.display())]
    MissingBaseFile { path: PathBuf },
    /// Reading a config file failed for a reason other than absence.
    #[error("failed to read config {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The working directory used as the default root is unavailable.
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    /// The file extension does not map to a known parser.
    #[error("unsupported config format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
    /// Parsing a config file failed.
    #[error("failed to parse config {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    /// The merged config does not satisfy the schema.
    #[error("invalid config: {0}")]
    Validation(ValidationErrors),
    /// Converting the validated mapping into the typed config failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// The declared config file list cannot be resolved.
    #[error("invalid config file list: {0}")]
    InvalidFileList(String),
    /// A form was built from an empty name.
    #[error("form name must not be empty")]
    EmptyForm,
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

/// Parser-level failures for a single config file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Json5(#[from] json5::Error),
    /// The document parsed, but its top level is not a mapping.
    #[error("top-level value must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A required field without a default is absent.
    Missing,
    /// The value has the wrong type.
    WrongType {
        expected: String,
        found: &'static str,
    },
    /// The key is not declared and the schema forbids unknown fields.
    Unknown,
}

/// One validation failure, addressed by a dotted path such as `server.port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{}: missing required field", self.path),
            FieldErrorKind::WrongType { expected, found } => {
                write!(f, "{}: expected {expected}, found {found}", self.path)
            }
            FieldErrorKind::Unknown => write!(f, "{}: unknown key", self.path),
        }
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, path: String, kind: FieldErrorKind) {
        self.errors.push(FieldError { path, kind });
    }

    /// True when no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of field errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the individual field errors in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Find the error recorded for a dotted path, if any.
    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.errors.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
