//! Layered configuration loader.
//!
//! Resolves base files plus form overlays, reads each layer, deep-merges
//! them in order, validates the merged mapping against a schema, and
//! decodes it into a typed config.

mod layer_io;
mod merge;
mod resolve;
pub(crate) mod schema;


use crate::{ConfigError, ConfigSchema, Form, form};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub use layer_io::FileFormat;
pub use merge::{merge, merge_into};
pub use resolve::{OverlayLayout, ResolvedPath, overlay_path, resolve};

/// Section of the load order a layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Declared by the config type; must exist.
    Base,
    /// Derived from a base file and the form; optional.
    Overlay,
}

/// Whether a layer contributed to the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStatus {
    Loaded,
    /// The overlay file does not exist.
    Skipped,
}

/// Metadata about one path considered during a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Section the path belongs to.
    pub kind: LayerKind,
    /// Location on disk, after joining with the root.
    pub path: PathBuf,
    pub status: LayerStatus,
}

/// Typed config plus metadata about the layers it came from.
#[derive(Debug, Clone)]
pub struct Manifested<T> {
    /// The merged, validated config.
    pub config: T,
    /// Form the overlays were resolved for.
    pub form: Form,
    /// Every path considered, in load order.
    pub layers: Vec<ConfigLayer>,
}

impl<T> Manifested<T> {
    /// Layers that were actually read and merged.
    pub fn loaded_layers(&self) -> impl Iterator<Item = &ConfigLayer> {
        self.layers
            .iter()
            .filter(|layer| layer.status == LayerStatus::Loaded)
    }
}

/// Options controlling where and how layers are resolved.
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    /// Directory relative config paths are resolved against.
    pub root: PathBuf,
    /// Explicit form; when unset the process-wide form is read once per call.
    pub form: Option<Form>,
    /// Replacement for the config type's declared base files.
    pub config_files: Option<Vec<PathBuf>>,
    /// Overlay naming convention.
    pub layout: OverlayLayout,
}

impl ManifestOptions {
    /// Create options resolving relative paths against `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            form: None,
            config_files: None,
            layout: OverlayLayout::default(),
        }
    }

    /// Options rooted at the current working directory.
    pub fn from_cwd() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Ok(Self::new(cwd))
    }

    /// Use this form instead of the process-wide one.
    pub fn with_form(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    /// Load these base files instead of the declared ones.
    pub fn with_config_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.config_files = Some(
            files
                .into_iter()
                .map(|path| path.as_ref().to_path_buf())
                .collect(),
        );
        self
    }

    pub fn with_layout(mut self, layout: OverlayLayout) -> Self {
        self.layout = layout;
        self
    }

    fn effective_form(&self) -> Form {
        match &self.form {
            Some(form) => form.clone(),
            None => form::get_form(),
        }
    }
}

/// A configuration type assembled from layered files.
///
/// ```no_run
/// use chimera_conf::{ChimeraConf, ConfigSchema, FieldSpec};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct AppConfig {
///     api_key: String,
///     timeout: u64,
/// }
///
/// impl ChimeraConf for AppConfig {
///     const CONFIG_FILES: &'static [&'static str] = &["configs/base.yaml"];
///
///     fn schema() -> ConfigSchema {
///         ConfigSchema::new()
///             .field("api_key", FieldSpec::string())
///             .field("timeout", FieldSpec::integer().default_value(30))
///     }
/// }
///
/// chimera_conf::set_form("prod".parse()?);
/// let config = AppConfig::manifest()?;
/// # Ok::<(), chimera_conf::ConfigError>(())
/// ```
pub trait ChimeraConf: DeserializeOwned {
    /// Base files, relative to the manifest root, in merge order.
    const CONFIG_FILES: &'static [&'static str];

    /// Shape the merged mapping must satisfy.
    fn schema() -> ConfigSchema;

    /// Manifest from the current directory using the process-wide form.
    fn manifest() -> Result<Self, ConfigError> {
        Self::manifest_with_options(ManifestOptions::from_cwd()?)
    }

    fn manifest_with_options(options: ManifestOptions) -> Result<Self, ConfigError> {
        Self::manifest_layered(options).map(|manifested| manifested.config)
    }

    /// Manifest and report which layers were loaded or skipped.
    fn manifest_layered(options: ManifestOptions) -> Result<Manifested<Self>, ConfigError> {
        let type_name = std::any::type_name::<Self>();
        let files = match options.config_files.clone() {
            Some(files) => {
                debug!("using overridden config files for {type_name}: {files:?}");
                files
            }
            None => Self::CONFIG_FILES.iter().map(PathBuf::from).collect(),
        };
        info!("manifesting config for {type_name}");
        let (value, form, layers) = manifest_parts(&files, &Self::schema(), &options)?;
        let config = serde_json::from_value(Value::Object(value))?;
        Ok(Manifested {
            config,
            form,
            layers,
        })
    }
}

/// Manifest an untyped config: resolve, load, merge and validate.
///
/// Returns the validated mapping with defaults applied and the layer
/// metadata.
pub fn manifest_value(
    files: &[PathBuf],
    schema: &ConfigSchema,
    options: &ManifestOptions,
) -> Result<(Map<String, Value>, Vec<ConfigLayer>), ConfigError> {
    manifest_parts(files, schema, options).map(|(value, _, layers)| (value, layers))
}

fn manifest_parts(
    files: &[PathBuf],
    schema: &ConfigSchema,
    options: &ManifestOptions,
) -> Result<(Map<String, Value>, Form, Vec<ConfigLayer>), ConfigError> {
    if files.is_empty() {
        return Err(ConfigError::InvalidFileList(
            "at least one config file is required".to_string(),
        ));
    }

    let form = options.effective_form();
    info!(
        "loading layered config (form={}, base_files={}, root={})",
        form,
        files.len(),
        options.root.display()
    );

    let resolved = resolve(files, &form, options.layout)?;
    let mut layers = Vec::with_capacity(resolved.len());
    let mut values = Vec::with_capacity(resolved.len());
    for entry in resolved {
        let path = options.root.join(&entry.path);
        let status = match layer_io::load_layer(&path, entry.kind)? {
            Some(value) => {
                debug!("loaded layer (kind={:?}, path={})", entry.kind, path.display());
                values.push(value);
                LayerStatus::Loaded
            }
            None => LayerStatus::Skipped,
        };
        layers.push(ConfigLayer {
            kind: entry.kind,
            path,
            status,
        });
    }

    let merged = merge(values);
    let validated = schema.validate(merged)?;
    info!(
        "layered config loaded (form={}, layers={})",
        form,
        layers
            .iter()
            .filter(|layer| layer.status == LayerStatus::Loaded)
            .count()
    );
    Ok((validated, form, layers))
}
