//! digest-core — nginx-digest core library.
//!
//! This crate exposes the three pipeline layers as public modules, plus the
//! shared types used across all layers.
//!
//! # Architecture
//!
//! ```text
//! raw text ──► Tokenizer ──► ChronoStore ──► Query ──► report
//!                                 │
//!                                 └──► IpIndex (derived view)
//! ```
//!
//! Everything here is synchronous. Only `config` touches the filesystem;
//! loading dumps and fetching bot ranges lives in `digest-feeds`.

pub mod bots;
pub mod config;
pub mod error;
pub mod query;
pub mod store;
pub mod tokenizer;
pub mod types;

pub use error::{CidrError, FieldError, QueryError};
pub use store::{ChronoStore, IgnoredIps, IngestStats, IpIndex};
pub use types::{Record, Request, TrailingFields};
