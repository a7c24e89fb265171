//! The active form: which overlay context configs are manifested for.
//!
//! A single process-wide form is kept for callers that set it once at
//! startup. Callers that need several forms at once should pass one
//! explicitly through [`crate::ManifestOptions::with_form`]; the registry
//! only guards individual reads and writes, not a whole manifest call.

use crate::ConfigError;
use log::info;
use parking_lot::{RwLock, const_rwlock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Form used when none has been set.
pub const DEFAULT_FORM: &str = "local";

static ACTIVE_FORM: RwLock<Option<Form>> = const_rwlock(None);

/// Name of an overlay context such as `dev`, `prod` or `local`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Form(String);

impl Form {
    /// Build a form from a non-empty name.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyForm);
        }
        Ok(Self(name))
    }

    /// The default `local` form.
    pub fn local() -> Self {
        Self(DEFAULT_FORM.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::local()
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Form {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Form {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Form {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Form> for String {
    fn from(form: Form) -> Self {
        form.0
    }
}

/// Replace the process-wide active form.
///
/// Any name is accepted, including ones with no overlay directory on disk.
pub fn set_form(form: Form) {
    info!("setting active form to {form}");
    *ACTIVE_FORM.write() = Some(form);
}

/// The process-wide active form, or `local` if none was set.
pub fn get_form() -> Form {
    ACTIVE_FORM.read().clone().unwrap_or_default()
}

/// Forget any form set with [`set_form`], returning to `local`.
pub fn reset_form() {
    *ACTIVE_FORM.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_blank_names() {
        assert!(matches!(Form::new(""), Err(ConfigError::EmptyForm)));
        assert!(matches!(Form::new("  "), Err(ConfigError::EmptyForm)));
    }

    #[test]
    fn parses_and_displays() {
        let form: Form = "prod".parse().expect("form");
        assert_eq!(form.to_string(), "prod");
        assert_eq!(form.as_str(), "prod");
    }

    #[test]
    fn default_is_local() {
        assert_eq!(Form::default(), Form::local());
        assert_eq!(Form::local().as_str(), DEFAULT_FORM);
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let form = Form::new("dev").expect("form");
        let json = serde_json::to_string(&form).expect("serialize");
        assert_eq!(json, "\"dev\"");
        let empty: Result<Form, _> = serde_json::from_str("\"\"");
        assert!(empty.is_err());
    }
}
