//! In-memory store implementations.
//!
//! Used by tests and by local development runs that have no database.
//! They honour the same contracts as the Postgres repositories:
//! atomic email uniqueness and insertion-ordered listing.

pub mod file;
pub mod user;

pub use file::MemoryFileRecordStore;
pub use user::MemoryUserStore;
