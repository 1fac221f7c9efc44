//! # docvault-auth
//!
//! Authentication primitives for DocVault.
//!
//! ## Modules
//!
//! - `password` Argon2id credential hashing and verification
//! - `jwt` bearer token issuance and validation
//! - `gate` the access gate that resolves a bearer token to a live user

pub mod gate;
pub mod jwt;
pub mod password;

pub use gate::AccessGate;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
