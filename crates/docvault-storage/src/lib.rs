//! # docvault-storage
//!
//! Object store providers for DocVault and the local staging area that
//! holds uploads until they are pushed remotely. Supports Google Drive
//! (behind the `drive` feature) and an in-memory store.

pub mod providers;
pub mod staging;

pub use providers::build_object_store;
pub use staging::{StagedFile, StagingArea};
