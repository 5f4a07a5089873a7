//! Core types for digest-core.
//!
//! This module defines the parsed access-log [`Record`], the HTTP portion of
//! it ([`Request`]), and the variable-arity [`TrailingFields`] that follow the
//! byte count. It also owns the compact `YYMMDD HHMMSS` timestamp key used
//! when records are printed or compared as text.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::net::Ipv4Addr;

/// `strftime` layout of the sortable timestamp key (two-digit year).
pub const TIMESTAMP_KEY_FORMAT: &str = "%y%m%d %H%M%S";

/// Display width the source address is right-justified to.
pub const IP_DISPLAY_WIDTH: usize = 16;

/// One parsed access-log line.
///
/// `request` is `None` when the line ended before a quoted request field was
/// found. Such records still carry a timestamp and source address and take
/// part in time bucketing, but never match status or path filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Request time, converted to UTC and truncated to whole seconds.
    pub timestamp: DateTime<Utc>,
    /// Canonical (unpadded) client address.
    pub source_ip: Ipv4Addr,
    pub request: Option<Request>,
}

/// Everything after the bracketed timestamp: request line, status, size and
/// whichever trailing quoted fields were present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Whitespace-split request line. Usually `[method, path, protocol]`, but
    /// scanners and binary junk produce any number of tokens.
    pub tokens: Vec<String>,
    /// Status code exactly as logged; values outside 100–599 are kept as-is.
    pub status_code: i64,
    pub bytes_sent: u64,
    pub trailing: TrailingFields,
}

/// The quoted fields following the byte count, in log order.
///
/// Lines written by older log formats, or truncated lines, carry fewer of
/// them; each variant names how many were found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrailingFields {
    #[default]
    None,
    Referrer(String),
    UserAgent {
        referrer: String,
        user_agent: String,
    },
    Full {
        referrer: String,
        user_agent: String,
        forwarded_for: String,
    },
}

impl TrailingFields {
    /// Build from up to three field values, in log order. Values past the
    /// third are ignored.
    pub fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        match (values.next(), values.next(), values.next()) {
            (None, _, _) => TrailingFields::None,
            (Some(referrer), None, _) => TrailingFields::Referrer(referrer),
            (Some(referrer), Some(user_agent), None) => TrailingFields::UserAgent {
                referrer,
                user_agent,
            },
            (Some(referrer), Some(user_agent), Some(forwarded_for)) => TrailingFields::Full {
                referrer,
                user_agent,
                forwarded_for,
            },
        }
    }

    /// Number of trailing fields present (0–3).
    pub fn len(&self) -> usize {
        match self {
            TrailingFields::None => 0,
            TrailingFields::Referrer(_) => 1,
            TrailingFields::UserAgent { .. } => 2,
            TrailingFields::Full { .. } => 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn referrer(&self) -> Option<&str> {
        match self {
            TrailingFields::None => None,
            TrailingFields::Referrer(referrer)
            | TrailingFields::UserAgent { referrer, .. }
            | TrailingFields::Full { referrer, .. } => Some(referrer),
        }
    }

    pub fn user_agent(&self) -> Option<&str> {
        match self {
            TrailingFields::UserAgent { user_agent, .. }
            | TrailingFields::Full { user_agent, .. } => Some(user_agent),
            _ => None,
        }
    }

    pub fn forwarded_for(&self) -> Option<&str> {
        match self {
            TrailingFields::Full { forwarded_for, .. } => Some(forwarded_for),
            _ => None,
        }
    }
}

impl Record {
    /// A record with no request portion; [`crate::tokenizer::append_fields`]
    /// fills it in.
    pub fn new(timestamp: DateTime<Utc>, source_ip: Ipv4Addr) -> Self {
        Self {
            timestamp,
            source_ip,
            request: None,
        }
    }

    /// Source address right-justified to [`IP_DISPLAY_WIDTH`] for aligned
    /// output. Never use this for comparisons.
    pub fn padded_ip(&self) -> String {
        format!("{:>width$}", self.source_ip.to_string(), width = IP_DISPLAY_WIDTH)
    }

    /// The `YYMMDD HHMMSS` key of this record's timestamp.
    pub fn timestamp_key(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// Request-line tokens; empty when the line had no request field.
    pub fn tokens(&self) -> &[String] {
        self.request
            .as_ref()
            .map(|r| r.tokens.as_slice())
            .unwrap_or(&[])
    }

    pub fn status_code(&self) -> Option<i64> {
        self.request.as_ref().map(|r| r.status_code)
    }

    pub fn bytes_sent(&self) -> Option<u64> {
        self.request.as_ref().map(|r| r.bytes_sent)
    }

    /// The requested path, only for well-formed `method path protocol`
    /// request lines (three or more tokens).
    pub fn path(&self) -> Option<&str> {
        match self.tokens() {
            [_, path, _, ..] => Some(path.as_str()),
            _ => None,
        }
    }

    pub fn trailing(&self) -> Option<&TrailingFields> {
        self.request.as_ref().map(|r| &r.trailing)
    }
}

/// Render a UTC instant as the sortable `YYMMDD HHMMSS` key.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_KEY_FORMAT).to_string()
}

/// Parse a `YYMMDD HHMMSS` key back into a UTC instant.
pub fn parse_timestamp(key: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(key, TIMESTAMP_KEY_FORMAT).map(|naive| naive.and_utc())
}
