//! # Filesystem Object Store
//!
//! Objects live at `{root}/{bucket}/{key}`. Tags live in a JSON side file
//! at `{root}/{bucket}.tags/{key}.json`, outside the object tree so prefix
//! counts never see them.
//!
//! Writes go to a hidden `.{name}.{uuid}.tmp` sibling and are renamed into
//! place, so a crash never leaves a truncated object behind. Leftover temp
//! files are ignored by prefix counts.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use response_ingest::{Bucket, ObjectStore, StoreError};
use shared_types::TagSet;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

const TEMP_SUFFIX: &str = ".tmp";

/// Object store over a local directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: Bucket, key: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(bucket.to_string()).join(relative_key(key)?))
    }

    fn tags_path(&self, bucket: Bucket, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self
            .root
            .join(format!("{}.tags", bucket))
            .join(relative_key(key)?)
            .into_os_string();
        path.push(".json");
        Ok(PathBuf::from(path))
    }

    async fn require_object(&self, bucket: Bucket, key: &str) -> Result<(), StoreError> {
        match fs::metadata(self.object_path(bucket, key)?).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(not_found(key)),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

/// Keys are relative paths of normal components only.
fn relative_key(key: &str) -> Result<PathBuf, StoreError> {
    let path = Path::new(key);
    let valid = !key.is_empty()
        && !key.contains('\\')
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if valid {
        Ok(path.to_path_buf())
    } else {
        Err(StoreError::Backend(format!("invalid object key: {}", key)))
    }
}

fn not_found(key: &str) -> StoreError {
    StoreError::NotFound {
        key: key.to_string(),
    }
}

fn io_error(key: &str, e: std::io::Error) -> StoreError {
    if e.kind() == ErrorKind::NotFound {
        not_found(key)
    } else {
        StoreError::Backend(format!("{}: {}", key, e))
    }
}

async fn write_file(path: &Path, key: &str, body: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(key, e))?;
    }

    let name = path
        .file_name()
        .ok_or_else(|| StoreError::Backend(format!("invalid object key: {}", key)))?;
    let temp = path.with_file_name(format!(
        ".{}.{}{}",
        name.to_string_lossy(),
        Uuid::new_v4().simple(),
        TEMP_SUFFIX
    ));
    if let Err(e) = fs::write(&temp, body).await {
        let _ = fs::remove_file(&temp).await;
        return Err(io_error(key, e));
    }
    if let Err(e) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(io_error(key, e));
    }
    Ok(())
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|n| n.starts_with('.') && n.ends_with(TEMP_SUFFIX))
}

async fn remove_file(path: &Path, key: &str) -> Result<(), StoreError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(key, e)),
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get_object(&self, bucket: Bucket, key: &str) -> Result<Vec<u8>, StoreError> {
        fs::read(self.object_path(bucket, key)?)
            .await
            .map_err(|e| io_error(key, e))
    }

    async fn put_object(
        &self,
        bucket: Bucket,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), StoreError> {
        write_file(&self.object_path(bucket, key)?, key, &body).await?;
        remove_file(&self.tags_path(bucket, key)?, key).await?;
        debug!(%bucket, key, bytes = body.len(), "Stored object");
        Ok(())
    }

    async fn delete_object(&self, bucket: Bucket, key: &str) -> Result<(), StoreError> {
        remove_file(&self.object_path(bucket, key)?, key).await?;
        remove_file(&self.tags_path(bucket, key)?, key).await
    }

    async fn get_tags(&self, bucket: Bucket, key: &str) -> Result<TagSet, StoreError> {
        self.require_object(bucket, key).await?;
        match fs::read(self.tags_path(bucket, key)?).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("tags of {}: {}", key, e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(TagSet::new()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn put_tags(&self, bucket: Bucket, key: &str, tags: TagSet) -> Result<(), StoreError> {
        self.require_object(bucket, key).await?;
        let body = serde_json::to_vec(&tags)
            .map_err(|e| StoreError::Corrupt(format!("tags of {}: {}", key, e)))?;
        write_file(&self.tags_path(bucket, key)?, key, &body).await
    }

    async fn count_prefix(&self, bucket: Bucket, prefix: &str) -> Result<u64, StoreError> {
        let bucket_root = self.root.join(bucket.to_string());
        // Start the walk at the deepest directory the prefix names
        let start = match prefix.rfind('/') {
            Some(i) => bucket_root.join(relative_key(&prefix[..i])?),
            None => bucket_root.clone(),
        };

        let mut count = 0;
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(io_error(prefix, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| io_error(prefix, e))?
            {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(|e| io_error(prefix, e))?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if is_temp_file(&path) {
                    continue;
                } else if let Ok(relative) = path.strip_prefix(&bucket_root) {
                    let key = relative.to_string_lossy().replace('\\', "/");
                    if key.starts_with(prefix) {
                        count += 1;
                    }
                }
            }
        }
        Ok(count)
    }
}
