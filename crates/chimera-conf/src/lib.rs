//! Layered configuration loading.
//!
//! A config type declares its base files; manifesting it loads those files
//! plus the overlays for the active form, deep-merges them in order, checks
//! the result against a schema and decodes it into the typed config.

mod error;
mod form;
mod loader;
mod schema;

/// Public error types returned by manifest and validation APIs.
pub use error::{ConfigError, FieldError, FieldErrorKind, ParseError, ValidationErrors};
/// Active form registry.
pub use form::{DEFAULT_FORM, Form, get_form, reset_form, set_form};
/// Layer resolution, loading and merging.
pub use loader::{
    ChimeraConf, ConfigLayer, FileFormat, LayerKind, LayerStatus, ManifestOptions, Manifested,
    OverlayLayout, ResolvedPath, manifest_value, merge, merge_into, overlay_path, resolve,
};
/// Declarative schema models.
pub use schema::{ConfigSchema, FieldKind, FieldSpec, UnknownFields};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
