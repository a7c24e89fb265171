//! Overlay path resolution.

use super::LayerKind;
use crate::{ConfigError, Form};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where overlay files live relative to their base file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayLayout {
    /// `configs/base.yaml` -> `configs/<form>/base.yaml`.
    #[default]
    Subdirectory,
    /// `configs/base.yaml` -> `configs/base.<form>.yaml`.
    Suffix,
}

/// A path to load, tagged with the section it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub kind: LayerKind,
}

/// Expand base files into the full load order: every base path in declared
/// order, followed by each base path's overlay in the same order.
///
/// Existence is not checked here.
pub fn resolve(
    base_files: &[PathBuf],
    form: &Form,
    layout: OverlayLayout,
) -> Result<Vec<ResolvedPath>, ConfigError> {
    let mut overlays = Vec::with_capacity(base_files.len());
    for base in base_files {
        overlays.push(overlay_path(base, form, layout)?);
    }

    let resolved = base_files
        .iter()
        .cloned()
        .map(|path| ResolvedPath {
            path,
            kind: LayerKind::Base,
        })
        .chain(overlays.into_iter().map(|path| ResolvedPath {
            path,
            kind: LayerKind::Overlay,
        }))
        .collect();
    Ok(resolved)
}

/// Compute the overlay path of a single base file for a form.
pub fn overlay_path(base: &Path, form: &Form, layout: OverlayLayout) -> Result<PathBuf, ConfigError> {
    let file_name = base.file_name().ok_or_else(|| {
        ConfigError::InvalidFileList(format!(
            "config path has no file name: {}",
            base.display()
        ))
    })?;
    let parent = base.parent().unwrap_or_else(|| Path::new(""));

    let path = match layout {
        OverlayLayout::Subdirectory => parent.join(form.as_str()).join(file_name),
        OverlayLayout::Suffix => {
            let mut name = OsString::new();
            match (base.file_stem(), base.extension()) {
                (Some(stem), Some(ext)) => {
                    name.push(stem);
                    name.push(".");
                    name.push(form.as_str());
                    name.push(".");
                    name.push(ext);
                }
                _ => {
                    name.push(file_name);
                    name.push(".");
                    name.push(form.as_str());
                }
            }
            parent.join(name)
        }
    };
    Ok(path)
}
