use autoform::cli::{self, Cli};
use autoform::config::Settings;
use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the command output
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let settings = Settings::new(&cli)?;
    debug!(forms = settings.forms.len(), "settings loaded");

    let output = cli::run(&cli, &settings).await?;
    println!("{}", output);

    Ok(())
}
