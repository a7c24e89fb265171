use anyhow::{Context, Result};
use chimera_conf::{ChimeraConf, ConfigSchema, FieldKind, FieldSpec, Form, ManifestOptions};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the active form.
const FORM_ENV: &str = "CHIMERA_FORM";

#[derive(Debug, Serialize, Deserialize)]
struct AppConfig {
    service: ServiceConfig,
    proxy: Option<String>,
    endpoints: Vec<String>,
    database: DatabaseConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct ServiceConfig {
    name: String,
    timeout: u64,
    retries: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct DatabaseConfig {
    host: String,
    port: u16,
    pool: u32,
}

impl ChimeraConf for AppConfig {
    const CONFIG_FILES: &'static [&'static str] = &["configs/base.yaml", "configs/database.json"];

    fn schema() -> ConfigSchema {
        ConfigSchema::new()
            .field(
                "service",
                FieldSpec::object(
                    ConfigSchema::new()
                        .field("name", FieldSpec::string())
                        .field("timeout", FieldSpec::integer().default_value(30))
                        .field("retries", FieldSpec::integer().default_value(1)),
                ),
            )
            .field("proxy", FieldSpec::string().nullable().default_value(None::<String>))
            .field("endpoints", FieldSpec::list(FieldKind::String))
            .field(
                "database",
                FieldSpec::object(
                    ConfigSchema::new()
                        .field("host", FieldSpec::string())
                        .field("port", FieldSpec::integer().default_value(5432))
                        .field("pool", FieldSpec::integer().default_value(4)),
                ),
            )
    }
}

fn main() -> Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    if let Ok(name) = std::env::var(FORM_ENV) {
        let form: Form = name
            .parse()
            .with_context(|| format!("{FORM_ENV} must name a form"))?;
        chimera_conf::set_form(form);
    }

    let root = match std::env::args().nth(1) {
        Some(root) => PathBuf::from(root),
        None => PathBuf::from(env!("CARGO_MANIFEST_DIR")),
    };
    info!("manifesting demo config from {}", root.display());

    let manifested = AppConfig::manifest_layered(ManifestOptions::new(&root))
        .context("failed to manifest demo config")?;
    for layer in &manifested.layers {
        info!("{:?} {:?} {}", layer.kind, layer.status, layer.path.display());
    }

    println!("form: {}", manifested.form);
    println!(
        "{}",
        serde_json::to_string_pretty(&manifested.config).context("failed to render config")?
    );
    Ok(())
}
