//! Query layer — stateless filters and aggregations over record sequences.
//!
//! Every function accepts anything that iterates `&Record` (a store's slice,
//! or the `Vec<&Record>` returned by a previous query) and returns a fresh
//! view. Nothing here mutates or re-orders its input.

use crate::error::QueryError;
use crate::types::Record;
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Client-error status range.
pub const FAILURE_STATUS: RangeInclusive<i64> = 400..=499;

// ---------------------------------------------------------------------------
// Status and time filters
// ---------------------------------------------------------------------------

/// Records whose status code lies in `min..=max`. Records without a request
/// portion never match.
pub fn filter_by_status<'a, I>(records: I, min: i64, max: i64) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| r.status_code().is_some_and(|s| min <= s && s <= max))
        .collect()
}

/// Records with a 4xx status.
pub fn failures<'a, I>(records: I) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    filter_by_status(records, *FAILURE_STATUS.start(), *FAILURE_STATUS.end())
}

/// Records with `lower <= timestamp <= upper`.
pub fn filter_between<'a, I>(records: I, lower: DateTime<Utc>, upper: DateTime<Utc>) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| lower <= r.timestamp && r.timestamp <= upper)
        .collect()
}

// ---------------------------------------------------------------------------
// Time bucketing
// ---------------------------------------------------------------------------

/// One fixed-width time window `[start, start + period)` and the records that
/// fall inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<'a> {
    pub start: DateTime<Utc>,
    pub records: Vec<&'a Record>,
}

impl Bucket<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split `records` into consecutive windows of width `period`, starting at the
/// first record's timestamp.
///
/// `records` must be sorted ascending by timestamp; the result is meaningless
/// otherwise. Windows are produced until one starts after the last record, so
/// empty windows in between are kept and a single record yields one bucket.
pub fn bucket_by_period<'a, I>(records: I, period: TimeDelta) -> Result<Vec<Bucket<'a>>, QueryError>
where
    I: IntoIterator<Item = &'a Record>,
{
    if period <= TimeDelta::zero() {
        return Err(QueryError::InvalidPeriod(period));
    }
    let records: Vec<&'a Record> = records.into_iter().collect();
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(QueryError::NoRecords);
    };

    let mut buckets = Vec::new();
    let mut cursor = first.timestamp;
    let upper = last.timestamp;
    let mut next = 0;

    while cursor <= upper {
        // A window reaching past the representable range holds everything left.
        let Some(limit) = cursor.checked_add_signed(period) else {
            buckets.push(Bucket {
                start: cursor,
                records: records[next..].to_vec(),
            });
            break;
        };
        let taken = records[next..]
            .iter()
            .take_while(|r| r.timestamp < limit)
            .count();
        buckets.push(Bucket {
            start: cursor,
            records: records[next..next + taken].to_vec(),
        });
        next += taken;
        cursor = limit;
    }
    Ok(buckets)
}

/// 4xx responses bucketed by `period`.
pub fn failures_per_period<'a, I>(records: I, period: TimeDelta) -> Result<Vec<Bucket<'a>>, QueryError>
where
    I: IntoIterator<Item = &'a Record>,
{
    bucket_by_period(failures(records), period)
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Occurrence counts of request paths, remembering first-seen order for
/// tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathCounts<'a> {
    counts: Vec<(&'a str, usize)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> PathCounts<'a> {
    fn add(&mut self, path: &'a str) {
        match self.index.get(path) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(path, self.counts.len());
                self.counts.push((path, 1));
            }
        }
    }

    pub fn get(&self, path: &str) -> usize {
        self.index.get(path).map_or(0, |&slot| self.counts[slot].1)
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// The `n` most requested paths, highest count first. Equal counts keep
    /// the order the paths were first seen in.
    pub fn most_common(&self, n: usize) -> Vec<(&'a str, usize)> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Count request paths over records with a full `method path protocol`
/// request line. Shorter request lines are left out rather than counted as
/// a blank path.
pub fn path_counts<'a, I>(records: I) -> PathCounts<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts = PathCounts::default();
    for path in records.into_iter().filter_map(Record::path) {
        counts.add(path);
    }
    counts
}

/// How [`filter_by_path`] matches a request path.
#[derive(Debug, Clone)]
pub enum PathPattern {
    Prefix(String),
    Regex(Regex),
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
            PathPattern::Regex(re) => re.is_match(path),
        }
    }
}

/// Records whose path matches `pattern`.
pub fn filter_by_path<'a, I>(records: I, pattern: &PathPattern) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| r.path().is_some_and(|p| pattern.matches(p)))
        .collect()
}

/// Result of [`partition_by_prefix`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition<'a> {
    /// One entry per prefix, in the order the prefixes were given.
    pub groups: Vec<(String, Vec<&'a Record>)>,
    /// Records matching no prefix, including those without a path.
    pub unmatched: Vec<&'a Record>,
}

impl<'a> Partition<'a> {
    pub fn get(&self, prefix: &str) -> Option<&[&'a Record]> {
        self.groups
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, recs)| recs.as_slice())
    }
}

/// Assign each record to the first prefix, in list order, that its path
/// starts with. Order is the caller's choice: put specific prefixes before
/// general ones such as `/`.
pub fn partition_by_prefix<'a, P, I>(prefixes: &[P], records: I) -> Partition<'a>
where
    P: AsRef<str>,
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: Vec<(String, Vec<&'a Record>)> = prefixes
        .iter()
        .map(|p| (p.as_ref().to_string(), Vec::new()))
        .collect();
    let mut unmatched = Vec::new();

    for record in records {
        let slot = record
            .path()
            .and_then(|path| groups.iter().position(|(p, _)| path.starts_with(p.as_str())));
        match slot {
            Some(i) => groups[i].1.push(record),
            None => unmatched.push(record),
        }
    }

    Partition { groups, unmatched }
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

/// Records whose request line has more than the usual three tokens: JSON-RPC
/// probes, miners, protocol smuggling attempts.
pub fn find_anomalous<'a, I>(records: I) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| r.tokens().len() > 3)
        .collect()
}
