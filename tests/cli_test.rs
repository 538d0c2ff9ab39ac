use autoform::cli::{run, Cli};
use autoform::config::Settings;
use clap::Parser;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"
[
    {"name": "count", "type": "number", "defaultValue": 5},
    {"name": "tags", "type": "string-array"},
    {"name": "when", "type": "date"},
    {"name": "spec", "type": "file"},
    {"name": "extra", "type": "string", "defined": {"path": "count", "isSet": true}}
]
"#;

fn setup() -> anyhow::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("form.json"), SCHEMA)?;
    fs::write(temp_dir.path().join("model.json"), r#"{"count": 3, "extra": "x"}"#)?;
    fs::write(temp_dir.path().join("spec.json"), r#"{"type": "kafka"}"#)?;
    Ok(temp_dir)
}

async fn run_args(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let config = dir.join("autoform.toml");
    let mut argv = vec!["autoform", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);

    let cli = Cli::parse_from(argv);
    let settings = Settings::new(&cli)?;
    run(&cli, &settings).await
}

fn path(dir: &Path, name: &str) -> String {
    dir.join(name).to_string_lossy().to_string()
}

#[tokio::test]
async fn test_render_shows_defaults() -> anyhow::Result<()> {
    let dir = setup()?;
    let out = run_args(dir.path(), &["render", "--schema", &path(dir.path(), "form.json")]).await?;
    let rendered: Value = serde_json::from_str(&out)?;

    let fields = rendered["fields"].as_array().unwrap();
    // `extra` is hidden until `count` is set
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0]["label"], json!("Count"));
    assert_eq!(fields[0]["widget"]["type"], json!("number"));
    assert_eq!(fields[0]["widget"]["value"], json!(5));
    assert_eq!(rendered["custom"], Value::Null);

    Ok(())
}

#[tokio::test]
async fn test_edit_clears_and_prunes() -> anyhow::Result<()> {
    let dir = setup()?;
    let schema = path(dir.path(), "form.json");
    let model = path(dir.path(), "model.json");

    let out = run_args(
        dir.path(),
        &["edit", "--schema", &schema, "--model", &model, "--field", "count", "--input", ""],
    )
    .await?;
    assert_eq!(serde_json::from_str::<Value>(&out)?, json!({}));

    let out = run_args(
        dir.path(),
        &["edit", "--schema", &schema, "--model", &model, "--field", "tags", "--input", "a, b c"],
    )
    .await?;
    assert_eq!(
        serde_json::from_str::<Value>(&out)?,
        json!({"count": 3, "extra": "x", "tags": ["a", "b", "c"]})
    );

    Ok(())
}

#[tokio::test]
async fn test_edit_date_and_file() -> anyhow::Result<()> {
    let dir = setup()?;
    let schema = path(dir.path(), "form.json");

    let out = run_args(
        dir.path(),
        &[
            "edit", "--schema", &schema, "--field", "when",
            "--date", "2024-01-15 10:00:00", "--utc-offset", "-05:00",
        ],
    )
    .await?;
    assert_eq!(serde_json::from_str::<Value>(&out)?, json!({"when": "2024-01-15T10:00:00.000Z"}));

    let spec = path(dir.path(), "spec.json");
    let out = run_args(dir.path(), &["edit", "--schema", &schema, "--field", "spec", "--file", &spec]).await?;
    assert_eq!(serde_json::from_str::<Value>(&out)?, json!({"spec": {"type": "kafka"}}));

    Ok(())
}

#[tokio::test]
async fn test_ignored_input_keeps_model() -> anyhow::Result<()> {
    let dir = setup()?;
    let schema = path(dir.path(), "form.json");
    let model = path(dir.path(), "model.json");

    let out = run_args(
        dir.path(),
        &["edit", "--schema", &schema, "--model", &model, "--field", "count", "--input", "abc"],
    )
    .await?;
    assert_eq!(serde_json::from_str::<Value>(&out)?, json!({"count": 3, "extra": "x"}));

    Ok(())
}

#[tokio::test]
async fn test_named_form_from_config_dir() -> anyhow::Result<()> {
    let dir = setup()?;
    fs::create_dir_all(dir.path().join("config/forms"))?;
    fs::write(dir.path().join("config/forms/counts.json"), SCHEMA)?;

    let out = run_args(dir.path(), &["edit", "--form", "counts", "--field", "count", "--input", "7"]).await?;
    assert_eq!(serde_json::from_str::<Value>(&out)?, json!({"count": 7}));

    let err = run_args(dir.path(), &["render", "--form", "missing"]).await.unwrap_err();
    assert!(err.to_string().contains("No form named 'missing'"));

    Ok(())
}
