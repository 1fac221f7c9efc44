//! # docvault-database
//!
//! PostgreSQL connection management plus the two stores the core reads
//! and writes: the identity directory (users) and the metadata index
//! (file records). Each store is a trait with a Postgres implementation
//! and an in-memory implementation.

pub mod bootstrap;
pub mod memory;
pub mod repositories;
pub mod store;

pub use bootstrap::Database;
pub use memory::{MemoryFileRecordStore, MemoryUserStore};
pub use repositories::{FileRepository, UserRepository};
pub use store::{FileRecordStore, UserStore};
