//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing and credential hashing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Bearer token TTL in minutes.
    #[serde(default = "default_ttl")]
    pub jwt_ttl_minutes: u64,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub hash_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_iterations")]
    pub hash_iterations: u32,
    /// Argon2id degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_ttl_minutes: default_ttl(),
            hash_memory_kib: default_memory_kib(),
            hash_iterations: default_iterations(),
            hash_parallelism: default_parallelism(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_ttl() -> u64 {
    60
}

fn default_memory_kib() -> u32 {
    65_536
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    1
}
