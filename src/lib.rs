//! nginx-digest — access-log ingestion and traffic analysis.
//!
//! The binary reads one access-log dump, builds a
//! [`digest_core::ChronoStore`] from it and prints the reports selected on the
//! command line. This crate holds the report selection and rendering so that
//! integration tests can drive them without spawning the binary.
//!
//! # Architecture
//!
//! ```text
//! digest-feeds ──► digest-core ──► report ──► stdout
//!  (dump, bots)   (store, query)
//! ```

pub mod report;

use chrono::TimeDelta;
use digest_core::query::{self, Bucket};
use digest_core::{ChronoStore, QueryError, Record};

/// Which section(s) to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    All,
    Requests,
    Failures,
    Paths,
    Partition,
    Anomalies,
    Sources,
}

/// Report parameters resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub period: TimeDelta,
    pub top: usize,
    pub path_prefixes: Vec<String>,
}

/// Render the selected report over `records`, a view of `store` that may
/// already have had bot networks removed.
pub fn render(
    kind: ReportKind,
    store: &ChronoStore,
    records: &[&Record],
    settings: &Settings,
) -> Result<String, QueryError> {
    let records = records.iter().copied();
    let mut out = report::render_stats(&store.stats());

    if matches!(kind, ReportKind::All | ReportKind::Requests) {
        let buckets = empty_if_no_records(query::bucket_by_period(records.clone(), settings.period))?;
        out.push_str(&report::render_buckets("requests per period", &buckets));
    }
    if matches!(kind, ReportKind::All | ReportKind::Failures) {
        let buckets =
            empty_if_no_records(query::failures_per_period(records.clone(), settings.period))?;
        out.push_str(&report::render_buckets("4xx per period", &buckets));
    }
    if matches!(kind, ReportKind::All | ReportKind::Paths) {
        let counts = query::path_counts(records.clone());
        out.push_str(&report::render_paths(&counts, settings.top));
    }
    if matches!(kind, ReportKind::All | ReportKind::Partition) {
        let partition = query::partition_by_prefix(settings.path_prefixes.as_slice(), records.clone());
        out.push_str(&report::render_partition(&partition));
    }
    if matches!(kind, ReportKind::All | ReportKind::Anomalies) {
        let anomalous = query::find_anomalous(records.clone());
        out.push_str(&report::render_anomalies(&anomalous));
    }
    if matches!(kind, ReportKind::All | ReportKind::Sources) {
        let index = digest_core::IpIndex::build(records.clone());
        out.push_str(&report::render_sources(&index, settings.top));
    }
    Ok(out)
}

/// An empty view has nothing to bucket; print an empty table instead of
/// failing the whole report.
fn empty_if_no_records(result: Result<Vec<Bucket<'_>>, QueryError>) -> Result<Vec<Bucket<'_>>, QueryError> {
    match result {
        Err(QueryError::NoRecords) => Ok(Vec::new()),
        other => other,
    }
}
