//! In-process object store.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use futures::{TryStreamExt, stream};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{ByteStream, NewObject, ObjectMeta, ObjectPermission, ObjectStore};

#[derive(Debug, Clone)]
struct StoredObject {
    meta: ObjectMeta,
    data: Bytes,
    permissions: Vec<ObjectPermission>,
}

/// Object store that keeps every object in memory.
///
/// Used for local development (`storage.provider = "memory"`) and tests.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, StoredObject>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether an object with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Permissions granted on an object so far.
    pub fn permissions(&self, id: &str) -> Vec<ObjectPermission> {
        self.objects
            .get(id)
            .map(|o| o.permissions.clone())
            .unwrap_or_default()
    }

    fn missing(id: &str) -> AppError {
        AppError::not_found(format!("Object '{id}' not found"))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn create(&self, object: NewObject) -> AppResult<String> {
        let data = object
            .content
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .map_err(|e| AppError::upstream(format!("Failed to read object content: {e}")))?
            .freeze();

        let id = uuid::Uuid::new_v4().simple().to_string();
        self.objects.insert(
            id.clone(),
            StoredObject {
                meta: ObjectMeta {
                    id: id.clone(),
                    name: object.name,
                    mime_type: object.mime_type,
                },
                data,
                permissions: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn metadata(&self, id: &str) -> AppResult<ObjectMeta> {
        self.objects
            .get(id)
            .map(|o| o.meta.clone())
            .ok_or_else(|| Self::missing(id))
    }

    async fn read(&self, id: &str) -> AppResult<ByteStream> {
        let data = self
            .objects
            .get(id)
            .map(|o| o.data.clone())
            .ok_or_else(|| Self::missing(id))?;
        Ok(Box::pin(stream::once(async move { Ok(data) })))
    }

    async fn set_permission(&self, id: &str, permission: ObjectPermission) -> AppResult<()> {
        let mut object = self.objects.get_mut(id).ok_or_else(|| Self::missing(id))?;
        if !object.permissions.contains(&permission) {
            object.permissions.push(permission);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.objects
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::missing(id))
    }
}
