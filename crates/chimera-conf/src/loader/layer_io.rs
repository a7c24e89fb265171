//! IO helpers for reading config layers from disk.

use super::LayerKind;
use super::schema::value_kind;
use crate::{ConfigError, ParseError};
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Parser selected from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`, parsed strictly.
    Json,
    /// `.json5`
    Json5,
}

impl FileFormat {
    /// Pick a parser by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            "json5" => Some(FileFormat::Json5),
            _ => None,
        }
    }

    /// Parse file contents into a top-level mapping.
    pub fn parse(self, contents: &str) -> Result<Map<String, Value>, ParseError> {
        let value: Value = match self {
            FileFormat::Yaml => {
                if contents.trim().is_empty() {
                    Value::Null
                } else {
                    // `<<` merge keys are only resolved on a YAML value.
                    let mut yaml: serde_yaml::Value = serde_yaml::from_str(contents)?;
                    yaml.apply_merge()?;
                    serde_yaml::from_value(yaml)?
                }
            }
            FileFormat::Json => {
                if contents.trim().is_empty() {
                    Value::Null
                } else {
                    serde_json::from_str(contents)?
                }
            }
            FileFormat::Json5 => {
                if contents.trim().is_empty() {
                    Value::Null
                } else {
                    json5::from_str(contents)?
                }
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(ParseError::NotAMapping {
                found: value_kind(&other),
            }),
        }
    }
}

/// Load one layer from disk.
///
/// A missing overlay yields `Ok(None)`; a missing base file is fatal, as is
/// any parse failure.
pub(super) fn load_layer(path: &Path, kind: LayerKind) -> Result<Option<Map<String, Value>>, ConfigError> {
    let format = FileFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return match kind {
                LayerKind::Base => Err(ConfigError::MissingBaseFile {
                    path: path.to_path_buf(),
                }),
                LayerKind::Overlay => {
                    info!("overlay not found, skipping: {}", path.display());
                    Ok(None)
                }
            };
        }
        Err(source) => {
            return Err(ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    debug!(
        "loading config layer (kind={:?}, format={:?}, path={})",
        kind,
        format,
        path.display()
    );
    let map = format
        .parse(&contents)
        .map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn detects_format_by_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a/b.yaml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("b.YML")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("b.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("b.json5")), Some(FileFormat::Json5));
        assert_eq!(FileFormat::from_path(Path::new("b.toml")), None);
        assert_eq!(FileFormat::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn parses_each_format_into_a_mapping() {
        let yaml = FileFormat::Yaml.parse("server:\n  port: 80\ntags: [a, b]\n").expect("yaml");
        assert_eq!(Value::Object(yaml), json!({ "server": { "port": 80 }, "tags": ["a", "b"] }));

        let json = FileFormat::Json.parse(r#"{"timeout": 60}"#).expect("json");
        assert_eq!(Value::Object(json), json!({ "timeout": 60 }));

        let json5 = FileFormat::Json5.parse("{ timeout: 60, // comment\n }").expect("json5");
        assert_eq!(Value::Object(json5), json!({ "timeout": 60 }));
    }

    #[test]
    fn yaml_merge_keys_are_applied_inline() {
        let yaml = FileFormat::Yaml
            .parse("defaults: &d\n  a: 1\n  b: 1\nsvc:\n  <<: *d\n  b: 2\n")
            .expect("yaml");
        assert_eq!(
            Value::Object(yaml),
            json!({ "defaults": { "a": 1, "b": 1 }, "svc": { "a": 1, "b": 2 } })
        );
    }

    #[test]
    fn strict_json_rejects_json5_syntax() {
        let err = FileFormat::Json.parse("{ timeout: 60 }").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn empty_documents_are_empty_mappings() {
        assert!(FileFormat::Yaml.parse("").expect("empty").is_empty());
        assert!(FileFormat::Yaml.parse("~\n").expect("null").is_empty());
        assert!(FileFormat::Json.parse("  \n").expect("blank").is_empty());
    }

    #[test]
    fn non_mapping_documents_are_rejected() {
        let err = FileFormat::Yaml.parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, ParseError::NotAMapping { found: "list" }));
    }

    #[test]
    fn missing_files_depend_on_layer_kind() {
        let temp = TempDir::new().expect("tmp");
        let path = temp.path().join("absent.yaml");

        let err = load_layer(&path, LayerKind::Base).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseFile { .. }));

        let skipped = load_layer(&path, LayerKind::Overlay).expect("overlay");
        assert!(skipped.is_none());
    }

    #[test]
    fn malformed_overlay_is_fatal() {
        let temp = TempDir::new().expect("tmp");
        let path = temp.path().join("broken.yaml");
        fs::write(&path, "server: [unclosed\n").expect("write");

        let err = load_layer(&path, LayerKind::Overlay).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn unsupported_extension_is_fatal() {
        let temp = TempDir::new().expect("tmp");
        let path = temp.path().join("config.toml");
        fs::write(&path, "a = 1\n").expect("write");

        let err = load_layer(&path, LayerKind::Overlay).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn directory_in_place_of_file_is_a_read_error() {
        let temp = TempDir::new().expect("tmp");
        let path = temp.path().join("dir.yaml");
        fs::create_dir_all(&path).expect("dir");

        let err = load_layer(&path, LayerKind::Overlay).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
