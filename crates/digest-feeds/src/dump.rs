//! Dump loading — read a whole access log into memory.
//!
//! The store is built from one complete string, so there is no streaming
//! here. Bytes that are not valid UTF-8 are replaced rather than rejected:
//! nginx escapes most binary input, but not all log shippers do.

use crate::FeedError;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Where the log dump comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpSource {
    File(PathBuf),
    Stdin,
}

impl DumpSource {
    /// A named file wins; otherwise stdin, but only when something is piped
    /// into it. Returns `None` for an interactive terminal with no file.
    pub fn detect(path: Option<PathBuf>) -> Option<Self> {
        match path {
            Some(path) => Some(DumpSource::File(path)),
            None if !std::io::stdin().is_terminal() => Some(DumpSource::Stdin),
            None => None,
        }
    }

    /// Read the entire dump, lossily decoding it as UTF-8.
    pub async fn read(&self) -> Result<String, FeedError> {
        let bytes = match self {
            DumpSource::File(path) => tokio::fs::read(path).await.map_err(|source| {
                FeedError::Read {
                    path: path.clone(),
                    source,
                }
            })?,
            DumpSource::Stdin => {
                let mut buf = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut buf)
                    .await
                    .map_err(FeedError::Stdin)?;
                buf
            }
        };
        tracing::debug!(source = ?self, bytes = bytes.len(), "log dump read");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
