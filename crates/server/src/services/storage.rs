//! Object storage: bucket/key blobs held on the local filesystem under a
//! configured root. spec.md lists "filesystem blob storage" as an external
//! collaborator whose interface only needs to appear — this is a minimal
//! implementation of that interface using `tokio::fs`, grounded on the
//! `ObjectStorage` trait shape in `Qovery-engine/src/object_storage/mod.rs`.

use std::path::PathBuf;

use uuid::Uuid;

use crate::db::Repos;
use crate::domain::StorageObject;
use crate::error::{ApiError, ApiResult};

/// No hard limit is specified; this default keeps a single host from being
/// driven out of disk by one oversized upload.
const MAX_OBJECT_SIZE_BYTES: usize = 64 * 1024 * 1024;

pub struct StorageService {
    repos: Repos,
    root: PathBuf,
}

impl StorageService {
    pub fn new(repos: Repos, root: impl Into<PathBuf>) -> Self {
        Self { repos, root: root.into() }
    }

    pub async fn put(
        &self,
        user_id: Uuid,
        bucket: &str,
        key: &str,
        content_type: &str,
        body: &[u8],
    ) -> ApiResult<StorageObject> {
        if body.len() > MAX_OBJECT_SIZE_BYTES {
            return Err(ApiError::ObjectTooLarge(format!(
                "object exceeds {MAX_OBJECT_SIZE_BYTES} bytes"
            )));
        }

        let path = self.object_path(user_id, bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ApiError::internal)?;
        }
        tokio::fs::write(&path, body).await.map_err(ApiError::internal)?;

        let now = chrono::Utc::now();
        let object = StorageObject {
            id: Uuid::new_v4(),
            user_id,
            bucket: bucket.to_string(),
            key: key.to_string(),
            size_bytes: body.len() as i64,
            content_type: content_type.to_string(),
            path: path.to_string_lossy().into_owned(),
            created_at: now,
            updated_at: now,
        };
        self.repos.storage.put(&object).await?;
        Ok(object)
    }

    pub async fn get(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<(StorageObject, Vec<u8>)> {
        let object = self.repos.storage.get(user_id, bucket, key).await.map_err(|e| match e {
            ApiError::NotFound(m) => ApiError::ObjectNotFound(m),
            other => other,
        })?;
        let bytes = tokio::fs::read(&object.path).await.map_err(ApiError::internal)?;
        Ok((object, bytes))
    }

    pub async fn list(&self, user_id: Uuid, bucket: &str) -> ApiResult<Vec<StorageObject>> {
        self.repos.storage.list(user_id, bucket).await
    }

    pub async fn delete(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<()> {
        let object = self.repos.storage.get(user_id, bucket, key).await.map_err(|e| match e {
            ApiError::NotFound(m) => ApiError::ObjectNotFound(m),
            other => other,
        })?;
        // Best-effort: the DB row is authoritative even if the file is
        // already missing (e.g. manual cleanup).
        let _ = tokio::fs::remove_file(&object.path).await;
        self.repos.storage.delete(user_id, bucket, key).await
    }

    fn object_path(&self, user_id: Uuid, bucket: &str, key: &str) -> PathBuf {
        self.root.join(user_id.to_string()).join(bucket).join(key)
    }
}
