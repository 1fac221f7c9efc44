//! # docvault-api
//!
//! HTTP API layer for DocVault built on Axum.
//!
//! Provides the REST endpoints, the bearer-token extractor that runs the
//! access gate, middleware (CORS, request logging), DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
