//! Line tokenizer — splits one raw access-log line into record fields.
//!
//! Tokenizing happens in two stages so the store can reject a line cheaply
//! before doing any allocation-heavy work:
//!
//! 1. [`parse_prefix`] reads the leading IPv4 address and the bracketed
//!    timestamp at a fixed offset after it. Lines without them (diagnostic
//!    output interleaved by the container runtime, truncated writes) yield
//!    `None`.
//! 2. [`append_fields`] reads the quoted request line, status, byte count and
//!    up to three trailing quoted fields, starting at the cursor returned by
//!    the first stage.
//!
//! The input is untrusted. nginx escapes `"` inside fields as `\x22`, so a
//! bare `"` is always a delimiter here and escape sequences are kept as
//! opaque text. Neither stage panics on arbitrary input.

use crate::error::FieldError;
use crate::types::{format_timestamp, Record, Request, TrailingFields};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

/// Dotted quad at the very start of the line, each octet 0–255, not followed
/// by further word characters.
static LEADING_IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\b",
    )
    .expect("leading IPv4 pattern must compile")
});

/// Width of the remote-user column between the address and the timestamp.
/// In practice it is always `" - - "`.
const REMOTE_USER_WIDTH: usize = 5;

/// Width of `[19/Sep/2022:08:01:21 +0000]`.
const BRACKETED_TIMESTAMP_WIDTH: usize = 28;

const LOG_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Result of the first tokenizer stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePrefix {
    pub ip: Ipv4Addr,
    pub timestamp: DateTime<Utc>,
    /// Byte offset just past the timestamp's closing bracket and the space
    /// after it.
    pub cursor: usize,
}

impl LinePrefix {
    /// The `YYMMDD HHMMSS` key of the parsed timestamp.
    pub fn timestamp_key(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// Extract the client address and UTC timestamp from the start of `line`.
pub fn parse_prefix(line: &str) -> Option<LinePrefix> {
    let ip_match = LEADING_IPV4.find(line)?;
    let ip: Ipv4Addr = ip_match.as_str().parse().ok()?;

    let start = ip_match.end() + REMOTE_USER_WIDTH;
    let end = start + BRACKETED_TIMESTAMP_WIDTH;
    let bracketed = line.get(start..end)?;
    let inner = bracketed.strip_prefix('[')?.strip_suffix(']')?;

    let timestamp = DateTime::parse_from_str(inner, LOG_TIMESTAMP_FORMAT)
        .ok()?
        .with_timezone(&Utc);

    Some(LinePrefix {
        ip,
        timestamp,
        cursor: end + 1,
    })
}

/// Read the request line, status, size and trailing quoted fields of `line`
/// from `cursor` onwards into `record`.
///
/// A line without a complete quoted request field leaves `record` untouched
/// and is not an error. Missing or non-integer status/bytes is an error and
/// also leaves `record` untouched.
pub fn append_fields(record: &mut Record, line: &str, cursor: usize) -> Result<(), FieldError> {
    let Some(open) = find_quote(line, cursor) else {
        return Ok(());
    };
    let Some(close) = find_quote(line, open + 1) else {
        return Ok(());
    };

    let tokens = line[open + 1..close]
        .split_whitespace()
        .map(str::to_string)
        .collect();

    // Closing quote plus the single space separating it from the status.
    let numbers_at = close + 2;
    let mut numbers = line.get(numbers_at..).unwrap_or("").split(' ');
    let status_code = parse_number::<i64>(numbers.next(), "status code")?;
    let bytes_sent = parse_number::<u64>(numbers.next(), "bytes sent")?;

    let trailing = TrailingFields::from_values(quoted_fields(line, numbers_at, 3));

    record.request = Some(Request {
        tokens,
        status_code,
        bytes_sent,
        trailing,
    });
    Ok(())
}

/// Collect the inner text of up to `limit` consecutive `"..."` pairs found
/// after `from`. Stops at the first opening quote with no closing partner.
fn quoted_fields(line: &str, from: usize, limit: usize) -> Vec<String> {
    let mut fields = Vec::with_capacity(limit);
    let mut cursor = from;
    while fields.len() < limit {
        let Some(open) = find_quote(line, cursor) else {
            break;
        };
        let Some(close) = find_quote(line, open + 1) else {
            break;
        };
        fields.push(line[open + 1..close].to_string());
        cursor = close + 1;
    }
    fields
}

/// Byte offset of the first `"` at or after `from`.
fn find_quote(line: &str, from: usize) -> Option<usize> {
    line.as_bytes()
        .get(from..)?
        .iter()
        .position(|&b| b == b'"')
        .map(|pos| from + pos)
}

fn parse_number<T: std::str::FromStr>(
    token: Option<&str>,
    field: &'static str,
) -> Result<T, FieldError> {
    let token = token.map(str::trim).filter(|t| !t.is_empty());
    let Some(token) = token else {
        return Err(FieldError::Missing { field });
    };
    token.parse().map_err(|_| FieldError::NotInteger {
        field,
        value: token.to_string(),
    })
}
