use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{Error, Result};

/// Directory under the uploads root (and URL segment under `/uploads`) that
/// holds interview recordings.
pub const VIDEO_BUCKET: &str = "interview-videos";

/// Object storage for interview recordings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores `data` under `key` and returns its public URL. Existing objects
    /// are never overwritten.
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<String>;
}

fn check_key(key: &str) -> Result<&Path> {
    let path = Path::new(key);
    let safe = !key.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(path)
    } else {
        Err(Error::Validation(format!("invalid object key: {}", key)))
    }
}

/// Writes objects below `{root}/interview-videos/`; the router serves that
/// tree under `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    public_base: Url,
}

impl LocalMediaStorage {
    pub fn new(uploads_dir: impl Into<PathBuf>, public_base_url: &str) -> Result<Self> {
        let mut base = public_base_url.trim_end_matches('/').to_string();
        base.push('/');
        let public_base = Url::parse(&base)
            .map_err(|e| Error::Config(format!("Invalid PUBLIC_BASE_URL: {}", e)))?;

        Ok(Self {
            root: uploads_dir.into(),
            public_base,
        })
    }

    fn public_url(&self, key: &str) -> Result<String> {
        self.public_base
            .join(&format!("uploads/{}/{}", VIDEO_BUCKET, key))
            .map(String::from)
            .map_err(|e| Error::Storage(format!("cannot build media URL: {}", e)))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        let relative = check_key(key)?;
        let path = self.root.join(VIDEO_BUCKET).join(relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("cannot create {}: {}", parent.display(), e)))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| Error::Storage(format!("cannot create {}: {}", path.display(), e)))?;
        file.write_all(&data)
            .await
            .map_err(|e| Error::Storage(format!("write to {} failed: {}", path.display(), e)))?;
        file.flush().await?;

        tracing::info!(key, content_type, size = data.len(), "stored media object");
        self.public_url(key)
    }
}

/// Keeps objects in memory. `fail_uploads` makes every upload fail with a
/// storage error.
#[derive(Debug, Default)]
pub struct InMemoryMediaStorage {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    failing: AtomicBool,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    /// Content type and size of a stored object.
    pub fn object(&self, key: &str) -> Option<(String, usize)> {
        self.objects
            .lock()
            .ok()?
            .get(key)
            .map(|(data, content_type)| (content_type.clone(), data.len()))
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        check_key(key)?;
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Storage("object storage unavailable".to_string()));
        }

        let mut objects = self
            .objects
            .lock()
            .map_err(|_| Error::Storage("media store lock poisoned".to_string()))?;
        if objects.contains_key(key) {
            return Err(Error::Storage(format!("object already exists: {}", key)));
        }
        objects.insert(key.to_string(), (data, content_type.to_string()));
        Ok(format!("memory://{}/{}", VIDEO_BUCKET, key))
    }
}
