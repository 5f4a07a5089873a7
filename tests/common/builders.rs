//! Test builders — ergonomic constructors for `Record` fixtures.
//!
//! These builders are for readability in test assertions. They panic on
//! invalid input rather than returning `Result`.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use digest_core::{Record, Request, TrailingFields};
use std::net::Ipv4Addr;

/// Fluent builder for [`Record`] test fixtures.
///
/// ```rust
/// let rec = RecordBuilder::at(2022, 9, 19, 8, 0, 0)
///     .ip("10.0.0.1")
///     .request("GET /feed/ HTTP/1.1")
///     .status(404)
///     .build();
/// ```
pub struct RecordBuilder {
    timestamp: DateTime<Utc>,
    ip: Ipv4Addr,
    tokens: Option<Vec<String>>,
    status: i64,
    bytes: u64,
}

impl RecordBuilder {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Self::ts(
            Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
                .single()
                .expect("valid test timestamp"),
        )
    }

    pub fn ts(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ip: Ipv4Addr::new(10, 0, 0, 1),
            tokens: None,
            status: 200,
            bytes: 0,
        }
    }

    pub fn ip(mut self, ip: &str) -> Self {
        self.ip = ip.parse().expect("valid test address");
        self
    }

    /// Request line; split on whitespace like the tokenizer does.
    pub fn request(mut self, line: &str) -> Self {
        self.tokens = Some(line.split_whitespace().map(str::to_string).collect());
        self
    }

    pub fn path(self, path: &str) -> Self {
        self.request(&format!("GET {path} HTTP/1.1"))
    }

    pub fn status(mut self, status: i64) -> Self {
        self.status = status;
        self.tokens.get_or_insert_with(|| vec!["GET".into(), "/".into(), "HTTP/1.1".into()]);
        self
    }

    pub fn bytes(mut self, bytes: u64) -> Self {
        self.bytes = bytes;
        self
    }

    pub fn build(self) -> Record {
        let mut record = Record::new(self.timestamp, self.ip);
        record.request = self.tokens.map(|tokens| Request {
            tokens,
            status_code: self.status,
            bytes_sent: self.bytes,
            trailing: TrailingFields::None,
        });
        record
    }
}

/// `count` records one `step_secs` apart starting at 2022-09-19 00:00:00,
/// alternating 200 and 404.
pub fn spaced_records(count: usize, step_secs: i64) -> Vec<Record> {
    let start = Utc.with_ymd_and_hms(2022, 9, 19, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            RecordBuilder::ts(start + chrono::TimeDelta::seconds(step_secs * i as i64))
                .status(if i % 2 == 0 { 200 } else { 404 })
                .build()
        })
        .collect()
}
