use anyhow::Context;
use clap::Parser;
use schedule_faq::{generate_faq, Category, Conference, FaqIndex};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "generate-faq",
    version,
    about = "Precompute FAQ entries from a conference schedule"
)]
struct Cli {
    /// Conference schedule to read
    #[arg(long, env = "FAQ_INPUT", default_value = "data/conference.json")]
    input: PathBuf,

    /// FAQ file to write
    #[arg(long, env = "FAQ_OUTPUT", default_value = "data/faq.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let conference = Conference::load(&cli.input)?;
    let faq = generate_faq(&conference)?;

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&faq)?;
    fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    let index = FaqIndex::from_entries(faq);
    let counts = index.count_by_category();
    for category in Category::ALL {
        tracing::info!(
            category = %category,
            entries = counts.get(&category).copied().unwrap_or(0),
            "FAQ entries by category"
        );
    }
    tracing::info!(
        total = index.len(),
        output = %cli.output.display(),
        "FAQ generated"
    );

    Ok(())
}
