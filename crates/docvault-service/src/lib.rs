//! # docvault-service
//!
//! Business logic for DocVault. The identity service handles
//! registration and login; the custody pipeline moves documents between
//! the staging area, the object store and the metadata index.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod custody;
pub mod identity;


pub use context::RequestContext;
pub use custody::{
    CustodyPipeline, Disposition, FetchMode, FetchResult, UploadOutcome, UploadParams,
};
pub use identity::{AuthOutcome, IdentityService};
