//! Bot ranges — sources of crawler networks to exclude from analysis.
//!
//! Search engines publish their crawler address ranges as JSON documents of
//! the form `{"prefixes": [{"ipv4Prefix": "66.249.64.0/27"}, {"ipv6Prefix": ...}]}`.
//! [`HttpRanges`] fetches such a document; [`StaticRanges`] serves a fixed
//! list (from configuration, or in tests).

use crate::FeedError;
use digest_core::bots::parse_cidrs;
use ipnet::IpNet;
use serde::Deserialize;
use std::future::Future;

/// Something that can produce the current list of networks to exclude.
pub trait RangeSource {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn fetch(&self) -> impl Future<Output = Result<Vec<IpNet>, FeedError>> + Send;
}

// ---------------------------------------------------------------------------
// HttpRanges
// ---------------------------------------------------------------------------

/// Fetches a published prefix document with a single GET.
#[derive(Debug, Clone)]
pub struct HttpRanges {
    url: String,
    client: reqwest::Client,
}

impl HttpRanges {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl RangeSource for HttpRanges {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<IpNet>, FeedError> {
        let http_err = |source| FeedError::Http {
            url: self.url.clone(),
            source,
        };
        let body = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_err)?
            .text()
            .await
            .map_err(http_err)?;

        let networks = parse_prefix_document(&body)?;
        tracing::info!(url = %self.url, networks = networks.len(), "bot ranges fetched");
        Ok(networks)
    }
}

// ---------------------------------------------------------------------------
// StaticRanges
// ---------------------------------------------------------------------------

/// A fixed list of networks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRanges(pub Vec<IpNet>);

impl RangeSource for StaticRanges {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<IpNet>, FeedError> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Document parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PrefixDocument {
    #[serde(default)]
    prefixes: Vec<PrefixEntry>,
}

#[derive(Debug, Deserialize)]
struct PrefixEntry {
    #[serde(rename = "ipv4Prefix")]
    ipv4: Option<String>,
    #[serde(rename = "ipv6Prefix")]
    ipv6: Option<String>,
}

/// Parse a published prefix document into networks. Entries carrying neither
/// an IPv4 nor an IPv6 prefix are skipped.
pub fn parse_prefix_document(json: &str) -> Result<Vec<IpNet>, FeedError> {
    let document: PrefixDocument = serde_json::from_str(json)?;
    let cidrs = document
        .prefixes
        .into_iter()
        .filter_map(|entry| entry.ipv4.or(entry.ipv6));
    Ok(parse_cidrs(cidrs)?)
}
