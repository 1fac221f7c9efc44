//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use docvault_auth::{AccessGate, JwtDecoder, JwtEncoder, PasswordHasher};
use docvault_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig, ShareConfig,
    StorageConfig,
};
use docvault_core::result::AppResult;
use docvault_core::traits::{ByteStream, NewObject, ObjectMeta, ObjectPermission, ObjectStore};
use docvault_database::{MemoryFileRecordStore, MemoryUserStore};
use docvault_service::{CustodyPipeline, IdentityService};
use docvault_storage::StagingArea;
use docvault_storage::providers::memory::MemoryObjectStore;

pub const BOUNDARY: &str = "docvault-test-boundary";

/// Memory object store that counts every call made to it.
#[derive(Debug, Default)]
pub struct CountingObjectStore {
    pub inner: MemoryObjectStore,
    calls: AtomicUsize,
    create_delay: Option<Duration>,
}

impl CountingObjectStore {
    /// A store whose `create` stalls for `delay` before storing anything
    pub fn with_create_delay(delay: Duration) -> Self {
        Self {
            create_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for CountingObjectStore {
    fn provider_type(&self) -> &str {
        "counting"
    }

    async fn create(&self, object: NewObject) -> AppResult<String> {
        self.tick();
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.create(object).await
    }

    async fn metadata(&self, id: &str) -> AppResult<ObjectMeta> {
        self.tick();
        self.inner.metadata(id).await
    }

    async fn read(&self, id: &str) -> AppResult<ByteStream> {
        self.tick();
        self.inner.read(id).await
    }

    async fn set_permission(&self, id: &str, permission: ObjectPermission) -> AppResult<()> {
        self.tick();
        self.inner.set_permission(id, permission).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.tick();
        self.inner.delete(id).await
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Identity directory, for acting as an operator would
    pub users: Arc<MemoryUserStore>,
    /// Metadata index
    pub index: Arc<MemoryFileRecordStore>,
    /// Remote object store
    pub objects: Arc<CountingObjectStore>,
    /// Staging root; removed on drop
    pub staging_dir: TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_default_recipient(None).await
    }

    /// Create a test application with a configured share recipient
    pub async fn with_default_recipient(recipient: Option<&str>) -> Self {
        let staging_dir = TempDir::new().expect("Failed to create staging dir");
        let config = test_config(staging_dir.path().to_string_lossy().into_owned(), recipient);
        Self::build(config, staging_dir, CountingObjectStore::default()).await
    }

    /// Create a test application with a request deadline and a given object store
    pub async fn with_deadline(request_timeout_seconds: u64, objects: CountingObjectStore) -> Self {
        let staging_dir = TempDir::new().expect("Failed to create staging dir");
        let mut config = test_config(staging_dir.path().to_string_lossy().into_owned(), None);
        config.server.request_timeout_seconds = request_timeout_seconds;
        Self::build(config, staging_dir, objects).await
    }

    async fn build(config: AppConfig, staging_dir: TempDir, objects: CountingObjectStore) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let index = Arc::new(MemoryFileRecordStore::new());
        let objects = Arc::new(objects);

        let staging = StagingArea::new(&config.storage.staging_dir)
            .await
            .expect("Failed to init staging area");
        let hasher = PasswordHasher::new(&config.auth).expect("Failed to build hasher");
        let encoder = JwtEncoder::new(&config.auth);
        let gate = AccessGate::new(JwtDecoder::new(&config.auth), users.clone());

        let identity = IdentityService::new(users.clone(), hasher, encoder);
        let custody = CustodyPipeline::new(
            objects.clone(),
            index.clone(),
            config.share.default_recipient.clone(),
        );

        let state = docvault_api::AppState::new(config, identity, custody, gate, staging);
        let router = docvault_api::build_router(state);

        Self {
            router,
            users,
            index,
            objects,
            staging_dir,
        }
    }

    /// Register a user and return the response
    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            })),
            None,
        )
        .await
    }

    /// Login and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Register then login, returning the token
    pub async fn signed_in(&self, email: &str) -> String {
        let response = self.register("Tester", email, "secret-pass").await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        self.login(email, "secret-pass").await
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// POST a multipart upload
    pub async fn upload(
        &self,
        file: Option<(&str, &[u8])>,
        fields: &[(&str, &str)],
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(multipart_body(file, fields)))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let raw = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body: Value = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }

    /// Number of files left in the staging directory
    pub fn staged_count(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Wait for abandoned staged files to be removed, returning how many remain
    pub async fn settled_staged_count(&self) -> usize {
        for _ in 0..50 {
            if self.staged_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.staged_count()
    }
}

/// Build a `multipart/form-data` body with an optional `file` part
pub fn multipart_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn test_config(staging_dir: String, recipient: Option<&str>) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            hash_memory_kib: 1024,
            hash_iterations: 1,
            ..AuthConfig::default()
        },
        storage: StorageConfig {
            provider: "memory".to_string(),
            staging_dir,
            ..StorageConfig::default()
        },
        share: ShareConfig {
            default_recipient: recipient.map(str::to_string),
        },
        logging: LoggingConfig::default(),
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body bytes
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// A header value as a string, or empty
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}
