use anyhow::Context;
use chrono::TimeDelta;
use clap::{CommandFactory, Parser};
use digest_core::{bots, config::Config, ChronoStore, Record};
use digest_feeds::{DumpSource, HttpRanges, RangeSource};
use nginx_digest::{ReportKind, Settings};
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nginx-digest", about = "Digest nginx access logs into traffic reports")]
struct Cli {
    /// Access log to read. Piped stdin is used when omitted.
    file: Option<PathBuf>,

    /// Config file to use instead of ~/.config/nginx-digest/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to stderr (RUST_LOG overrides the level).
    #[arg(long)]
    debug: bool,

    /// Additional address to drop during ingestion. Repeatable.
    #[arg(long = "ignore", value_name = "IP")]
    ignore: Vec<Ipv4Addr>,

    /// Bucket width for the per-period reports.
    #[arg(long)]
    period_minutes: Option<u32>,

    /// Rows shown in the paths and sources reports.
    #[arg(long)]
    top: Option<usize>,

    /// Fetch the published crawler ranges and drop their requests.
    #[arg(long)]
    exclude_bots: bool,

    #[arg(long, value_enum, default_value_t = ReportKind::All)]
    report: ReportKind,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    let Some(source) = DumpSource::detect(cli.file.clone()) else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|error| {
            tracing::warn!(%error, "falling back to built-in config");
            Config::defaults()
        }),
    };

    let mut ignored = config.ignored_ips()?;
    for ip in &cli.ignore {
        ignored.insert(*ip);
    }

    let text = source.read().await?;
    let store = ChronoStore::from_text(&text, &ignored);

    let mut networks = config.extra_networks()?;
    if cli.exclude_bots {
        let ranges = HttpRanges::new(config.bots.source_url.clone());
        let fetched = ranges
            .fetch()
            .await
            .with_context(|| format!("fetching bot ranges from {}", ranges.name()))?;
        networks.extend(fetched);
    }
    let records: Vec<&Record> = bots::exclude_networks(store.records(), &networks);
    tracing::debug!(
        kept = records.len(),
        dropped = store.len() - records.len(),
        "bot networks excluded"
    );

    let settings = Settings {
        period: cli
            .period_minutes
            .map(|m| TimeDelta::minutes(i64::from(m)))
            .unwrap_or_else(|| config.period()),
        top: cli.top.unwrap_or(config.report.top_paths),
        path_prefixes: config.report.path_prefixes.clone(),
    };

    let report = nginx_digest::render(cli.report, &store, &records, &settings)?;
    print!("{report}");
    Ok(())
}
