//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate
//! represents a database table row or the data needed to insert one.
//! Row types additionally derive `sqlx::FromRow`.

pub mod file;
pub mod user;
