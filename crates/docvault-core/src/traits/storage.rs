//! Object store capability trait for the remote storage service.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Metadata reported by the object store for a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Identifier assigned by the object store.
    pub id: String,
    /// Object name as recorded remotely.
    pub name: String,
    /// Content type as recorded remotely.
    pub mime_type: String,
}

/// An object to be created in the store.
///
/// The content is streamed; `size` must equal the number of bytes it yields.
pub struct NewObject {
    /// Display name of the object.
    pub name: String,
    /// Content type to record.
    pub mime_type: String,
    /// Content length in bytes.
    pub size: u64,
    /// Object contents.
    pub content: ByteStream,
}

impl NewObject {
    /// An object whose contents are already in memory.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: data.len() as u64,
            content: Box::pin(futures::stream::once(async move { Ok(data) })),
        }
    }
}

impl std::fmt::Debug for NewObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewObject")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// A read grant on a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectPermission {
    /// Anyone holding the link may read.
    AnyoneReader,
    /// A single principal, addressed by email, may read.
    UserReader {
        /// Principal email address.
        email: String,
    },
}

/// Trait for the remote object storage service.
///
/// Implementations classify their own failures: a missing object is
/// `NotFound`, every transport or authorization failure is
/// `UpstreamUnavailable`. Callers never retry.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. `"drive"`, `"memory"`).
    fn provider_type(&self) -> &str;

    /// Create an object and return the identifier assigned by the store.
    async fn create(&self, object: NewObject) -> AppResult<String>;

    /// Fetch the remote metadata of an object.
    async fn metadata(&self, id: &str) -> AppResult<ObjectMeta>;

    /// Open a byte stream over an object's contents.
    async fn read(&self, id: &str) -> AppResult<ByteStream>;

    /// Grant a read permission on an object.
    async fn set_permission(&self, id: &str, permission: ObjectPermission) -> AppResult<()>;

    /// Delete an object.
    async fn delete(&self, id: &str) -> AppResult<()>;
}
