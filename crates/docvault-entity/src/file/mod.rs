//! File record domain entities.

pub mod model;

pub use model::{CreateFileRecord, FileRecord};
