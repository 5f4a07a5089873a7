//! Store — the chronological, append-once sequence of [`Record`] values.
//!
//! [`ChronoStore`] is the single source of truth. It is built from a full log
//! dump in one pass and never mutated afterwards; every query returns a new
//! derived view. [`IpIndex`] is one such view, grouping the same records by
//! client address.

use crate::tokenizer::{append_fields, parse_prefix};
use crate::types::Record;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;

// ---------------------------------------------------------------------------
// Ignored addresses
// ---------------------------------------------------------------------------

/// Client addresses whose requests never enter the store, typically the
/// operator's own test machines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredIps(HashSet<Ipv4Addr>);

impl IgnoredIps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, ip: &Ipv4Addr) -> bool {
        self.0.contains(ip)
    }

    pub fn insert(&mut self, ip: Ipv4Addr) -> bool {
        self.0.insert(ip)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse textual addresses, e.g. from configuration.
    pub fn parse<I, S>(addresses: I) -> Result<Self, std::net::AddrParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        addresses
            .into_iter()
            .map(|a| a.as_ref().trim().parse::<Ipv4Addr>())
            .collect::<Result<HashSet<_>, _>>()
            .map(Self)
    }
}

impl FromIterator<Ipv4Addr> for IgnoredIps {
    fn from_iter<T: IntoIterator<Item = Ipv4Addr>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Ingestion counters
// ---------------------------------------------------------------------------

/// What happened to each input line during construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines: usize,
    pub records: usize,
    /// Lines without a leading address and timestamp.
    pub foreign: usize,
    pub ignored: usize,
    /// Lines whose status or byte count was not an integer.
    pub malformed: usize,
}

// ---------------------------------------------------------------------------
// ChronoStore
// ---------------------------------------------------------------------------

/// Records in the order they appear in the dump.
///
/// The store does not sort. nginx appends in completion order, so a single
/// access log is already (near enough) ascending; callers combining several
/// dumps must sort them before relying on time bucketing.
#[derive(Debug, Clone, Default)]
pub struct ChronoStore {
    records: Vec<Record>,
    ignored: IgnoredIps,
    stats: IngestStats,
}

impl ChronoStore {
    /// Tokenize every line of `text`, dropping foreign, ignored and malformed
    /// lines.
    pub fn from_text(text: &str, ignored: &IgnoredIps) -> Self {
        let mut records = Vec::new();
        let mut stats = IngestStats::default();

        for (line_no, line) in text.lines().enumerate() {
            stats.lines += 1;

            let Some(prefix) = parse_prefix(line) else {
                tracing::trace!(line_no, "no address/timestamp prefix, skipping");
                stats.foreign += 1;
                continue;
            };
            if ignored.contains(&prefix.ip) {
                stats.ignored += 1;
                continue;
            }

            let mut record = Record::new(prefix.timestamp, prefix.ip);
            if let Err(error) = append_fields(&mut record, line, prefix.cursor) {
                tracing::debug!(line_no, %error, "malformed access-log line, skipping");
                stats.malformed += 1;
                continue;
            }
            records.push(record);
        }

        stats.records = records.len();
        tracing::info!(
            lines = stats.lines,
            records = stats.records,
            foreign = stats.foreign,
            ignored = stats.ignored,
            malformed = stats.malformed,
            "access log ingested"
        );

        Self {
            records,
            ignored: ignored.clone(),
            stats,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn ignored_ips(&self) -> &IgnoredIps {
        &self.ignored
    }

    /// Group the records by client address.
    pub fn by_ip(&self) -> IpIndex<'_> {
        IpIndex::build(&self.records)
    }
}

// ---------------------------------------------------------------------------
// IpIndex
// ---------------------------------------------------------------------------

/// Records grouped by client address, each group in store order.
///
/// Useful for "who is hammering us" questions; time slicing belongs on the
/// chronological sequence, which is far cheaper to walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IpIndex<'a> {
    groups: HashMap<Ipv4Addr, Vec<&'a Record>>,
}

impl<'a> IpIndex<'a> {
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut groups: HashMap<Ipv4Addr, Vec<&'a Record>> = HashMap::new();
        for record in records {
            groups.entry(record.source_ip).or_default().push(record);
        }
        Self { groups }
    }

    pub fn get(&self, ip: &Ipv4Addr) -> Option<&[&'a Record]> {
        self.groups.get(ip).map(Vec::as_slice)
    }

    /// Number of distinct addresses.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Addr, &[&'a Record])> {
        self.groups.iter().map(|(ip, recs)| (ip, recs.as_slice()))
    }

    /// Addresses with their request counts, busiest first. Ties are ordered
    /// by address so output is stable.
    pub fn most_requests(&self) -> Vec<(Ipv4Addr, usize)> {
        let mut counts: Vec<_> = self
            .groups
            .iter()
            .map(|(ip, recs)| (*ip, recs.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }

    /// Count of 4xx responses per address. Addresses with none are included
    /// with a count of zero.
    pub fn failures_per_ip(&self) -> HashMap<Ipv4Addr, usize> {
        self.groups
            .iter()
            .map(|(ip, recs)| {
                let failures = recs
                    .iter()
                    .filter(|r| matches!(r.status_code(), Some(400..=499)))
                    .count();
                (*ip, failures)
            })
            .collect()
    }

    /// Keep only records with `lower <= timestamp <= upper`. Addresses left
    /// with no records are dropped.
    pub fn filter_between(&self, lower: DateTime<Utc>, upper: DateTime<Utc>) -> IpIndex<'a> {
        let groups = self
            .groups
            .iter()
            .filter_map(|(ip, recs)| {
                let kept: Vec<&'a Record> = recs
                    .iter()
                    .copied()
                    .filter(|r| lower <= r.timestamp && r.timestamp <= upper)
                    .collect();
                (!kept.is_empty()).then_some((*ip, kept))
            })
            .collect();
        IpIndex { groups }
    }
}
