//! In-memory object store.
//!
//! Backs tests and local development. Supports injecting failures per
//! operation so dependency-failure paths can be exercised.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::TagSet;

use crate::error::StoreError;
use crate::ports::{Bucket, ObjectStore};

/// Store operations, for failure injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Get,
    Put,
    Delete,
    GetTags,
    PutTags,
    Count,
}

#[derive(Clone, Debug, Default)]
struct StoredObject {
    body: Vec<u8>,
    tags: TagSet,
}

/// Object store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<(Bucket, String), StoredObject>>,
    failing: Mutex<HashSet<(Bucket, StoreOperation)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object with tags.
    pub fn insert_tagged(&self, bucket: Bucket, key: &str, body: Vec<u8>, tags: TagSet) {
        self.objects
            .write()
            .insert((bucket, key.to_string()), StoredObject { body, tags });
    }

    /// Seed an object without tags.
    pub fn insert(&self, bucket: Bucket, key: &str, body: Vec<u8>) {
        self.insert_tagged(bucket, key, body, TagSet::new());
    }

    pub fn contains(&self, bucket: Bucket, key: &str) -> bool {
        self.objects.read().contains_key(&(bucket, key.to_string()))
    }

    pub fn body(&self, bucket: Bucket, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .get(&(bucket, key.to_string()))
            .map(|o| o.body.clone())
    }

    pub fn tags(&self, bucket: Bucket, key: &str) -> Option<TagSet> {
        self.objects
            .read()
            .get(&(bucket, key.to_string()))
            .map(|o| o.tags.clone())
    }

    /// Keys in `bucket` starting with `prefix`, sorted.
    pub fn keys(&self, bucket: Bucket, prefix: &str) -> Vec<String> {
        self.objects
            .read()
            .keys()
            .filter(|(b, key)| *b == bucket && key.starts_with(prefix))
            .map(|(_, key)| key.clone())
            .collect()
    }

    /// Make `operation` on `bucket` fail until cleared.
    pub fn fail(&self, bucket: Bucket, operation: StoreOperation) {
        self.failing.lock().insert((bucket, operation));
    }

    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }

    fn check(&self, bucket: Bucket, operation: StoreOperation) -> Result<(), StoreError> {
        if self.failing.lock().contains(&(bucket, operation)) {
            return Err(StoreError::Backend(format!(
                "injected {:?} failure on {} bucket",
                operation, bucket
            )));
        }
        Ok(())
    }

    fn not_found(key: &str) -> StoreError {
        StoreError::NotFound {
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: Bucket, key: &str) -> Result<Vec<u8>, StoreError> {
        self.check(bucket, StoreOperation::Get)?;
        self.body(bucket, key).ok_or_else(|| Self::not_found(key))
    }

    async fn put_object(
        &self,
        bucket: Bucket,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.check(bucket, StoreOperation::Put)?;
        self.insert(bucket, key, body);
        Ok(())
    }

    async fn delete_object(&self, bucket: Bucket, key: &str) -> Result<(), StoreError> {
        self.check(bucket, StoreOperation::Delete)?;
        self.objects.write().remove(&(bucket, key.to_string()));
        Ok(())
    }

    async fn get_tags(&self, bucket: Bucket, key: &str) -> Result<TagSet, StoreError> {
        self.check(bucket, StoreOperation::GetTags)?;
        self.tags(bucket, key).ok_or_else(|| Self::not_found(key))
    }

    async fn put_tags(&self, bucket: Bucket, key: &str, tags: TagSet) -> Result<(), StoreError> {
        self.check(bucket, StoreOperation::PutTags)?;
        let mut objects = self.objects.write();
        let object = objects
            .get_mut(&(bucket, key.to_string()))
            .ok_or_else(|| Self::not_found(key))?;
        object.tags = tags;
        Ok(())
    }

    async fn count_prefix(&self, bucket: Bucket, prefix: &str) -> Result<u64, StoreError> {
        self.check(bucket, StoreOperation::Count)?;
        Ok(self.keys(bucket, prefix).len() as u64)
    }
}
