use anyhow::Context;
use chrono::{FixedOffset, Local, Offset};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

use crate::config::{load_schema, read_document, Settings};
use crate::form::date::parse_date;
use crate::form::{make_label_name, AutoForm, FieldEvent, FormSchema};

/// Schema-driven form engine - render and edit models from field schemas
#[derive(Parser, Debug, Clone)]
#[command(name = "autoform", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "AUTOFORM_CONFIG", default_value = "autoform.toml")]
    pub config: PathBuf,

    /// Console title override
    #[arg(long, env = "AUTOFORM_TITLE")]
    pub title: Option<String>,

    /// Base URL override for API requests
    #[arg(long, env = "AUTOFORM_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the rendered fields of a form as JSON
    Render(FormArgs),
    /// Apply one edit to a field and print the resulting model
    Edit {
        #[command(flatten)]
        form: FormArgs,

        /// Name (path) of the field to edit
        #[arg(long)]
        field: String,

        #[command(flatten)]
        edit: EditArgs,
    },
    /// Print the label derived from a field name
    Label { name: String },
}

#[derive(Args, Debug, Clone)]
pub struct FormArgs {
    /// Schema file (JSON, YAML or TOML)
    #[arg(long, conflicts_with = "form")]
    pub schema: Option<PathBuf>,

    /// Name of a form loaded from config/forms
    #[arg(long)]
    pub form: Option<String>,

    /// Model file; defaults to an empty object
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Display offset for date fields, e.g. -05:00; defaults to the local zone
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct EditArgs {
    /// Text typed into the field
    #[arg(long, allow_hyphen_values = true)]
    pub input: Option<String>,

    /// Leave the field (clears empty strings)
    #[arg(long)]
    pub blur: bool,

    /// Click False or True
    #[arg(long)]
    pub toggle: Option<bool>,

    /// Raw JSON editor text
    #[arg(long, allow_hyphen_values = true)]
    pub json: Option<String>,

    /// File whose contents are loaded into a file field
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Picked date as YYYY-MM-DD HH:MM:SS; empty clears the field
    #[arg(long)]
    pub date: Option<String>,
}

impl FormArgs {
    fn schema(&self, settings: &Settings) -> anyhow::Result<FormSchema> {
        match (&self.schema, &self.form) {
            (Some(path), _) => load_schema(path),
            (None, Some(name)) => settings
                .form(name)
                .cloned()
                .with_context(|| format!("No form named '{}' in config/forms", name)),
            (None, None) => anyhow::bail!("Either --schema or --form is required"),
        }
    }

    fn model(&self) -> anyhow::Result<Value> {
        match &self.model {
            Some(path) => read_document(path),
            None => Ok(json!({})),
        }
    }

    fn offset(&self) -> anyhow::Result<FixedOffset> {
        match &self.utc_offset {
            Some(raw) => raw
                .parse::<FixedOffset>()
                .map_err(|e| anyhow::anyhow!("Invalid --utc-offset '{}': {}", raw, e)),
            None => Ok(Local::now().offset().fix()),
        }
    }

    fn build(&self, settings: &Settings, sink: Rc<RefCell<Option<Value>>>) -> anyhow::Result<AutoForm> {
        let schema = self.schema(settings)?;
        let model = self.model()?;

        let mut form = AutoForm::new(schema.fields, Some(model), move |m| {
            *sink.borrow_mut() = Some(m);
        })
        .with_local_offset(self.offset()?);
        if let Some(show_custom) = schema.show_custom {
            form = form.with_show_custom(show_custom);
        }
        Ok(form)
    }
}

impl EditArgs {
    fn event(&self, offset: FixedOffset) -> anyhow::Result<Option<FieldEvent>> {
        let event = if let Some(text) = &self.input {
            FieldEvent::Input(text.clone())
        } else if self.blur {
            FieldEvent::Blur
        } else if let Some(b) = self.toggle {
            FieldEvent::Toggle(b)
        } else if let Some(text) = &self.json {
            FieldEvent::Json(text.clone())
        } else if let Some(text) = &self.date {
            let picked = if text.trim().is_empty() {
                None
            } else {
                Some(parse_date(text, offset)?)
            };
            FieldEvent::DatePicked(picked)
        } else {
            return Ok(None);
        };
        Ok(Some(event))
    }
}

/// Execute a parsed command and return what should be printed
pub async fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<String> {
    match &cli.command {
        Command::Label { name } => Ok(make_label_name(name)),
        Command::Render(args) => {
            let form = args.build(settings, Rc::new(RefCell::new(None)))?;
            let rendered = form.render();
            Ok(serde_json::to_string_pretty(&rendered)?)
        }
        Command::Edit { form: args, field, edit } => {
            let changed = Rc::new(RefCell::new(None));
            let mut form = args.build(settings, changed.clone())?;

            match (&edit.file, edit.event(args.offset()?)?) {
                (Some(path), _) => form.load_file(field, path).await?,
                (None, Some(event)) => form.handle(field, event)?,
                (None, None) => anyhow::bail!("No edit given"),
            }

            let result = changed.borrow_mut().take();
            let model = match result {
                Some(model) => model,
                None => {
                    info!(field = %field, "edit ignored, model unchanged");
                    form.model().cloned().unwrap_or(Value::Null)
                }
            };
            Ok(serde_json::to_string_pretty(&model)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["autoform", "label", "numRows"]);
        assert_eq!(cli.config, PathBuf::from("autoform.toml"));
        assert!(cli.title.is_none());
        assert!(cli.base_url.is_none());
        assert!(matches!(cli.command, Command::Label { ref name } if name == "numRows"));
    }

    #[test]
    fn test_cli_edit_args() {
        let cli = Cli::parse_from([
            "autoform",
            "--config",
            "custom.toml",
            "--base-url",
            "https://druid.example.com",
            "edit",
            "--schema",
            "fields.yaml",
            "--field",
            "count",
            "--input",
            "-3",
            "--utc-offset",
            "-05:00",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.base_url.as_deref(), Some("https://druid.example.com"));
        match cli.command {
            Command::Edit { form, field, edit } => {
                assert_eq!(form.schema, Some(PathBuf::from("fields.yaml")));
                assert_eq!(field, "count");
                assert_eq!(edit.input.as_deref(), Some("-3"));
                let offset = form.offset().unwrap();
                assert_eq!(offset.local_minus_utc(), -5 * 3600);
                assert_eq!(
                    edit.event(offset).unwrap(),
                    Some(FieldEvent::Input("-3".into()))
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_one_edit() {
        let result = Cli::try_parse_from([
            "autoform", "edit", "--schema", "f.json", "--field", "a", "--blur", "--toggle", "true",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["autoform", "edit", "--schema", "f.json", "--field", "a"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_label() {
        let cli = Cli::parse_from(["autoform", "label", "a.b.C"]);
        let out = run(&cli, &Settings::default()).await.unwrap();
        assert_eq!(out, "A b  c");
    }
}
