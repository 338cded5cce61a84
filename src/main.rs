//! story-score: binary entrypoint.
//! Reads story records as JSON, scores them with the hype and ethics scorers,
//! and writes one JSON result per record to stdout.

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use story_scorer::{ScoringConfig, ScoringPipeline, StoryContent};

#[derive(Debug, Parser)]
#[command(name = "story-score", version, about = "Score news stories for hype and ethical impact")]
struct Cli {
    /// Scoring table (TOML). Defaults to $SCORING_CONFIG_PATH, then the built-in table.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Include matched terms and signal breakdowns.
    #[arg(long, conflicts_with = "record")]
    explain: bool,

    /// Emit the flat storage shape (hype_score, ethics_impact_score, ethical_impact_tags).
    #[arg(long)]
    record: bool,

    #[arg(long, help = "Pretty-print JSON output")]
    pretty: bool,

    #[arg(long, help = "Log as JSON instead of compact text")]
    log_json: bool,

    /// JSON object, JSON array, or JSON Lines. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("story_scorer=info,scoring=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init();
    }
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("reading input from {}", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Whole document first (object or array), JSON Lines as the fallback.
fn parse_records(text: &str) -> anyhow::Result<Vec<Value>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    if let Ok(v) = serde_json::from_str::<Value>(text) {
        return Ok(match v {
            Value::Array(items) => items,
            other => vec![other],
        });
    }

    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let v = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid JSON", i + 1))?;
        out.push(v);
    }
    Ok(out)
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let cfg = match &cli.config {
        Some(p) => ScoringConfig::from_path(p)?,
        None => ScoringConfig::from_env()?,
    };
    let pipeline = ScoringPipeline::new(&cfg)?;

    let records = parse_records(&read_input(cli.input.as_ref())?)?;
    let mut stories = Vec::with_capacity(records.len());
    for (i, v) in records.iter().enumerate() {
        let story = StoryContent::from_json_value(v).with_context(|| format!("record {i}"))?;
        stories.push(story);
    }
    if stories.is_empty() {
        bail!("no story records in input");
    }
    tracing::info!(count = stories.len(), "scoring stories");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for story in &stories {
        if cli.explain {
            emit(&mut out, &pipeline.explain(story), cli.pretty)?;
        } else {
            let result = pipeline.run(story);
            if cli.record {
                emit(&mut out, &result.to_record(), cli.pretty)?;
            } else {
                emit(&mut out, &result, cli.pretty)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
