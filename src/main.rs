mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

use posterforge::config;
use posterforge::document::Document;
use posterforge::paths;
use posterforge::pipeline::{AuditStatus, Mode, Pipeline, PipelineOutcome};
use posterforge::tmdb::TmdbClient;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise key the default off --verbose.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "posterforge=debug".to_string()
        } else {
            "posterforge=info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Posters { api_key, input } => {
            run_pipeline(api_key, input, cli.config.as_deref(), Mode::PostersOnly)
        }
        Commands::All { api_key, input } => {
            run_pipeline(api_key, input, cli.config.as_deref(), Mode::PostersAndTrailers)
        }
        Commands::Scan { input } => scan(input, cli.config.as_deref()),
        Commands::Version => {
            println!("posterforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_pipeline(
    api_key: Option<String>,
    input: Option<PathBuf>,
    config_path: Option<&Path>,
    mode: Mode,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let api_key = api_key
        .or_else(|| std::env::var("TMDB_API_KEY").ok())
        .context("TMDB API key required as first argument or TMDB_API_KEY env var")?;

    let input_path = paths::resolve_input_path(input.as_deref())
        .context("could not find a readable content file (pass a path explicitly)")?;

    tracing::info!(input = %input_path.display(), %mode, "starting run");
    println!("Using input file: {}", input_path.display());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let text = tokio::fs::read_to_string(&input_path)
            .await
            .with_context(|| format!("failed to read input file: {:?}", input_path))?;

        let provider = Arc::new(TmdbClient::with_base_url(
            api_key,
            config.tmdb.base_url.clone(),
        ));
        let pipeline = Pipeline::new(provider, config.clone());
        let outcome = pipeline.run(text, mode).await;

        write_outputs(&input_path, &config, &outcome).await?;
        print_summary(&outcome);
        Ok(())
    })
}

/// All outputs are written once, after the full pass. The input file is
/// never overwritten: the patched document goes to a sibling file.
async fn write_outputs(
    input_path: &Path,
    config: &config::Config,
    outcome: &PipelineOutcome,
) -> Result<()> {
    let out_path = input_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(&config.output.document);
    tokio::fs::write(&out_path, &outcome.document)
        .await
        .with_context(|| format!("failed to write patched document: {:?}", out_path))?;

    let audit_json = serde_json::to_string_pretty(&outcome.audit)?;
    tokio::fs::write(&config.output.audit_log, audit_json)
        .await
        .with_context(|| format!("failed to write audit log: {}", config.output.audit_log))?;

    let review_json = serde_json::to_string_pretty(&outcome.review)?;
    tokio::fs::write(&config.output.review_log, review_json)
        .await
        .with_context(|| format!("failed to write review log: {}", config.output.review_log))?;

    println!("\nWrote: {}", out_path.display());
    println!("Audit log: {}", config.output.audit_log);
    println!("Review log: {}", config.output.review_log);
    Ok(())
}

fn print_summary(outcome: &PipelineOutcome) {
    println!(
        "Summary: {} updated, {} need review, {} errors",
        outcome.count(AuditStatus::Ok),
        outcome.count(AuditStatus::NeedsReview),
        outcome.count(AuditStatus::Error),
    );
}

/// Offline inspection of the content file: which fragments were found
/// and which of them would be enriched.
fn scan(input: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let input_path = paths::resolve_input_path(input.as_deref())
        .context("could not find a readable content file (pass a path explicitly)")?;

    let text = std::fs::read_to_string(&input_path)
        .with_context(|| format!("failed to read input file: {:?}", input_path))?;

    let doc = Document::new(text);
    let fragments = doc.fragments();
    let eligible = fragments
        .iter()
        .filter(|f| f.needs_enrichment(&config.pipeline.placeholder_host))
        .count();

    println!("File: {}", input_path.display());
    println!("Fragments: {}", fragments.len());
    for frag in &fragments {
        let marker = if frag.needs_enrichment(&config.pipeline.placeholder_host) {
            "replace"
        } else {
            "keep"
        };
        let trailer = if frag.trailer.is_some() {
            " [trailer]"
        } else {
            ""
        };
        println!("  [{marker}] {}{trailer}", frag.title);
    }
    println!("{eligible} fragments need enrichment");

    Ok(())
}
