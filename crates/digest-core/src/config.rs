//! Configuration types for nginx-digest.
//!
//! [`Config::load`] reads `~/.config/nginx-digest/config.toml`, creating it
//! with hardcoded defaults if it does not yet exist. [`Config::load_from`]
//! layers an explicit file over the defaults instead. [`Config::defaults`]
//! returns the same defaults without touching the filesystem (useful in tests).

use crate::bots::parse_cidrs;
use crate::store::IgnoredIps;
use anyhow::Context;
use chrono::TimeDelta;
use ipnet::IpNet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ingest]
ignored_ips = ["172.18.0.1", "46.64.34.27"]

[report]
period_minutes = 60
top_paths      = 10
path_prefixes  = ["/old/", "/new/", "/blog/", "/feed/", "/static/", "/wordpress/", "/wp/", "/"]

[bots]
source_url  = "https://developers.google.com/static/search/apis/ipranges/googlebot.json"
extra_cidrs = []
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from
/// `~/.config/nginx-digest/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub bots: BotsConfig,
}

/// `[ingest]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    /// Trusted test machines whose requests are dropped during ingestion.
    #[serde(default)]
    pub ignored_ips: Vec<String>,
}

/// `[report]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_period_minutes")]
    pub period_minutes: u32,
    #[serde(default = "default_top_paths")]
    pub top_paths: usize,
    /// Checked in order; the first prefix a path starts with wins.
    #[serde(default)]
    pub path_prefixes: Vec<String>,
}

fn default_period_minutes() -> u32 { 60 }
fn default_top_paths() -> usize { 10 }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            period_minutes: default_period_minutes(),
            top_paths: default_top_paths(),
            path_prefixes: Vec::new(),
        }
    }
}

/// `[bots]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotsConfig {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    /// Additional networks to exclude alongside the fetched list.
    #[serde(default)]
    pub extra_cidrs: Vec<String>,
}

fn default_source_url() -> String {
    "https://developers.google.com/static/search/apis/ipranges/googlebot.json".to_string()
}

impl Default for BotsConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            extra_cidrs: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/nginx-digest/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(&path, false)
    }

    /// Load an explicit file layered on top of the built-in defaults. The file
    /// must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(path, true)
            .with_context(|| format!("loading config from {}", path.display()))
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(required))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// `[ingest] ignored_ips` as a parsed set.
    pub fn ignored_ips(&self) -> anyhow::Result<IgnoredIps> {
        IgnoredIps::parse(&self.ingest.ignored_ips).context("invalid address in ingest.ignored_ips")
    }

    /// `[report] period_minutes` as a bucket width.
    pub fn period(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.report.period_minutes))
    }

    /// `[bots] extra_cidrs` as parsed networks.
    pub fn extra_networks(&self) -> anyhow::Result<Vec<IpNet>> {
        parse_cidrs(&self.bots.extra_cidrs).context("invalid network in bots.extra_cidrs")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("nginx-digest")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
