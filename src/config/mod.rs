use anyhow::Context;
use config::{Config, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub mod validator;

use crate::cli::Cli;
use crate::domain::auth::AuthConfig;
use crate::domain::console::ConsoleConfig;
use crate::form::FormSchema;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub console: ConsoleConfig,
    /// Identity provider settings; fetched from the server when absent
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    /// Form schemas loaded from `config/forms`
    #[serde(skip)]
    pub forms: Vec<FormSchema>,
}

impl Settings {
    /// Load settings for the CLI: config file, then CLI/env overrides, then
    /// the form schema directory next to the config file
    pub fn new(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        let root = config_path
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let s = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .set_default("console.hide_legacy", false)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.load_forms_from_dir(&format!("{}/config/forms", root))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("autoform");
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("console.hide_legacy", false)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        settings.load_forms_from_dir(&format!("{}/config/forms", root))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(title) = &cli.title {
            self.console.title = Some(title.clone());
        }
        if let Some(base_url) = &cli.base_url {
            self.console.base_url = Some(base_url.clone());
        }
    }

    pub fn form(&self, name: &str) -> Option<&FormSchema> {
        self.forms.iter().find(|f| f.name == name)
    }

    fn load_forms_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if matches!(ext, "json" | "yaml" | "yml" | "toml") {
                            let form = load_schema(&path)?;
                            tracing::debug!(form = %form.name, fields = form.fields.len(), "loaded form schema");
                            self.forms.push(form);
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        Ok(())
    }
}

/// Read a JSON, YAML or TOML document into a structured value
pub fn read_document(path: &Path) -> Result<Value, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let value: Value = match ext {
        "toml" => toml::from_str(&content)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(value)
}

/// Load a form schema file; bare field lists are named after the file stem
pub fn load_schema(path: &Path) -> Result<FormSchema, anyhow::Error> {
    let document = read_document(path)?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("form");
    FormSchema::from_document(document, stem)
        .with_context(|| format!("Invalid form schema in {}", path.display()))
}
