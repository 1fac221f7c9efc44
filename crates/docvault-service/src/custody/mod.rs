//! File custody: upload, listing, fetch, share and delete.
//!
//! Remote writes always precede index writes and remote deletes always
//! precede index deletes, so a record never points at an object that was
//! never created. The two windows this ordering leaves open are logged
//! at `error!` with a `consistency` field.

pub mod fetch;
pub mod pipeline;
pub mod upload;

pub use fetch::{Disposition, FetchMode, FetchResult};
pub use pipeline::CustodyPipeline;
pub use upload::{UploadOutcome, UploadParams};
