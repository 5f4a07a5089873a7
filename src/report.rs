//! Plain-text rendering of query results for the terminal.
//!
//! Each function returns a `String` ending in a newline so callers can print
//! sections back to back. Padded addresses keep columns aligned.

use digest_core::query::{Bucket, PathCounts, Partition};
use digest_core::types::format_timestamp;
use digest_core::{IngestStats, IpIndex, Record};
use std::fmt::Write;

/// One-line ingestion summary.
pub fn render_stats(stats: &IngestStats) -> String {
    format!(
        "{} lines: {} records, {} foreign, {} ignored, {} malformed\n",
        stats.lines, stats.records, stats.foreign, stats.ignored, stats.malformed
    )
}

/// A titled table of bucket start times and record counts.
pub fn render_buckets(title: &str, buckets: &[Bucket<'_>]) -> String {
    let mut out = format!("{title}\n");
    for bucket in buckets {
        let _ = writeln!(out, "  {}  {:>6}", format_timestamp(&bucket.start), bucket.len());
    }
    out
}

/// The `top` most requested paths.
pub fn render_paths(counts: &PathCounts<'_>, top: usize) -> String {
    let mut out = format!("top {top} of {} paths\n", counts.len());
    for (path, count) in counts.most_common(top) {
        let _ = writeln!(out, "  {count:>6}  {path}");
    }
    out
}

/// Record counts per prefix, in prefix order, then the unmatched remainder.
pub fn render_partition(partition: &Partition<'_>) -> String {
    let mut out = String::from("requests by path prefix\n");
    for (prefix, records) in &partition.groups {
        let _ = writeln!(out, "  {:>6}  {prefix}", records.len());
    }
    let _ = writeln!(out, "  {:>6}  (unmatched)", partition.unmatched.len());
    out
}

/// Anomalous requests, one per line with their raw request tokens.
pub fn render_anomalies(records: &[&Record]) -> String {
    let mut out = format!("{} anomalous requests\n", records.len());
    for record in records {
        let status = record
            .status_code()
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let _ = writeln!(
            out,
            "  {} {} {status} {}",
            record.timestamp_key(),
            record.padded_ip(),
            record.tokens().join(" ")
        );
    }
    out
}

/// The `top` busiest client addresses with their 4xx counts.
pub fn render_sources(index: &IpIndex<'_>, top: usize) -> String {
    let failures = index.failures_per_ip();
    let mut out = format!("top {top} of {} sources (requests / 4xx)\n", index.len());
    for (ip, requests) in index.most_requests().into_iter().take(top) {
        let failed = failures.get(&ip).copied().unwrap_or(0);
        let _ = writeln!(out, "  {:>16}  {requests:>6}  {failed:>6}", ip.to_string());
    }
    out
}
