use super::{is_safe_slug, DataSource, FetchError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads `<dir>/<name>.json` from the local filesystem.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, resource: &str) -> PathBuf {
        self.dir.join(format!("{resource}.json"))
    }
}

#[async_trait]
impl DataSource for DirSource {
    fn locate(&self, resource: &str) -> String {
        self.path_for(resource).display().to_string()
    }

    async fn fetch_bytes(&self, resource: &str) -> Result<Vec<u8>, FetchError> {
        if !is_safe_slug(resource) {
            return Err(FetchError::InvalidResource {
                resource: resource.to_string(),
            });
        }
        let path = self.path_for(resource);
        tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io { path, source })
    }
}
