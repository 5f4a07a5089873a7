//! digest-feeds — input collaborators for nginx-digest.
//!
//! Each adapter produces something the core consumes: [`dump`] turns a file
//! or piped stdin into one in-memory string for
//! [`digest_core::ChronoStore::from_text`], and [`bot_ranges`] fetches the
//! crawler networks handed to [`digest_core::bots::exclude_networks`].

pub mod bot_ranges;
pub mod dump;

pub use bot_ranges::{HttpRanges, RangeSource, StaticRanges};
pub use dump::DumpSource;

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading input for the core.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reading stdin: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("bot range document is not valid JSON: {0}")]
    Document(#[from] serde_json::Error),
    #[error(transparent)]
    Cidr(#[from] digest_core::CidrError),
}
