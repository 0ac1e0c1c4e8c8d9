use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use collate::config::load_sources;
use collate::export::{export_csv, export_json};
use collate::http::UreqTransport;
use collate::pipeline::Pipeline;
use collate::RetryPolicy;

/// Collect one unified record per configured source and export the batch.
#[derive(Debug, Parser)]
#[command(name = "collate", version, about)]
struct Cli {
    /// Path to the sources YAML config
    #[arg(long, default_value = "config/sources.yml")]
    config: PathBuf,

    /// Directory to write unified_records.csv / unified_records.json into
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Run everything except the final export
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let sources = load_sources(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    info!(sources = sources.len(), config = %cli.config.display(), "starting run");

    let policy = RetryPolicy::default();
    let transport = UreqTransport::new(policy.timeout);
    let report = Pipeline::new(policy, &transport).run(&sources);

    for failure in &report.failures {
        warn!(source = %failure.source_id, "skipped: {}", failure.message);
    }
    if report.issues.is_empty() {
        info!("validation: no issues");
    } else {
        for issue in &report.issues {
            warn!(
                record = issue.index,
                field = %issue.field,
                "validation: {}",
                issue.message
            );
        }
    }

    if cli.dry_run {
        info!(records = report.records.len(), "dry run, skipping export");
        return Ok(());
    }

    let csv_path = cli.output_dir.join("unified_records.csv");
    let json_path = cli.output_dir.join("unified_records.json");
    export_csv(&report.records, &csv_path)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    export_json(&report.records, &json_path)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    info!(
        records = report.records.len(),
        csv = %csv_path.display(),
        json = %json_path.display(),
        "export complete"
    );
    Ok(())
}
