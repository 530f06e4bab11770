//! Where semester resources come from.
//!
//! A site root is either an `http(s)://` URL or a local directory. Both expose
//! resources as `<root>/<data_dir>/<name>.json`.

mod dir;
mod http;
mod locator;

pub use dir::DirSource;
pub use http::HttpSource;
pub use locator::{is_safe_slug, resolve_data_source, ResourceLocator};

use crate::config::SiteConfig;
use crate::model::{SemesterIndex, SemesterRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {resource}")]
    Status { status: u16, resource: String },
    #[error("invalid resource name {resource:?}")]
    InvalidResource { resource: String },
    #[error("timed out fetching {resource}")]
    Timeout { resource: String },
    #[error("request for {resource} failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only access to named JSON resources.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable location of `resource`, for logs.
    fn locate(&self, resource: &str) -> String;

    async fn fetch_bytes(&self, resource: &str) -> Result<Vec<u8>, FetchError>;
}

pub async fn fetch_json<T: DeserializeOwned>(
    source: &dyn DataSource,
    resource: &str,
) -> Result<T, FetchError> {
    let bytes = source.fetch_bytes(resource).await?;
    serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
        resource: resource.to_string(),
        source,
    })
}

pub async fn fetch_semester(
    source: &dyn DataSource,
    resource: &str,
) -> Result<SemesterRecord, FetchError> {
    fetch_json(source, resource).await
}

pub async fn fetch_index(
    source: &dyn DataSource,
    index_name: &str,
) -> Result<SemesterIndex, FetchError> {
    fetch_json(source, index_name).await
}

fn is_remote(site_root: &str) -> bool {
    site_root.starts_with("http://") || site_root.starts_with("https://")
}

/// Build the source matching the configured site root.
pub fn open(cfg: &SiteConfig) -> Result<Box<dyn DataSource>> {
    if is_remote(&cfg.site_root) {
        let source = HttpSource::new(cfg)
            .with_context(|| format!("invalid site root {}", cfg.site_root))?;
        Ok(Box::new(source))
    } else {
        Ok(Box::new(DirSource::new(
            PathBuf::from(&cfg.site_root).join(&cfg.data_dir),
        )))
    }
}
