//! Google Drive v3 object store provider.
//!
//! Authenticates as a service account: a short-lived RS256 assertion is
//! exchanged for a bearer token at the key's `token_uri`, and the token is
//! cached until shortly before it expires.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{StreamExt, TryStreamExt, future, stream};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use docvault_core::config::DriveConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::{ByteStream, NewObject, ObjectMeta, ObjectPermission, ObjectStore};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Fields of a service-account key file used for token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account principal.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// OAuth token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    /// Parse a key from its JSON representation.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Invalid service account key",
                e,
            )
        })
    }

    /// Load a key from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Cannot read service account key {}", path.display()),
                e,
            )
        })?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionBody<'a> {
    role: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_address: Option<&'a str>,
}

/// Object store backed by Google Drive v3.
pub struct DriveObjectStore {
    client: reqwest::Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    scope: String,
    api_base: String,
    upload_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for DriveObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveObjectStore")
            .field("client_email", &self.key.client_email)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl DriveObjectStore {
    /// Create a Drive store from configuration, loading the service-account key.
    pub fn new(config: &DriveConfig) -> AppResult<Self> {
        if config.credentials_path.is_empty() {
            return Err(AppError::configuration(
                "storage.drive.credentials_path must be set for the drive provider",
            ));
        }
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;
        Self::with_key(config, key)
    }

    /// Create a Drive store from an already parsed key.
    pub fn with_key(config: &DriveConfig, key: ServiceAccountKey) -> AppResult<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Service account private key is not a valid RSA PEM",
                e,
            )
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Cannot build HTTP client", e)
            })?;

        info!(
            client_email = %key.client_email,
            api_base = %config.api_base_url,
            "Initializing Google Drive object store"
        );

        Ok(Self {
            client,
            key,
            signing_key,
            scope: config.scope.clone(),
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            upload_base: config.upload_base_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    /// Return a valid access token, exchanging a fresh assertion when needed.
    async fn access_token(&self) -> AppResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(cached.access_token.clone());
        }

        let assertion = self.sign_assertion()?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, "token exchange", "").await?;
        let token: TokenResponse = response.json().await.map_err(transport_error)?;

        debug!(expires_in = token.expires_in, "Obtained Drive access token");
        let access_token = token.access_token.clone();
        *guard = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(access_token)
    }

    fn sign_assertion(&self) -> AppResult<String> {
        let iat = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key).map_err(
            |e| AppError::with_source(ErrorKind::UpstreamUnavailable, "Cannot sign assertion", e),
        )
    }

    fn file_url(&self, id: &str) -> String {
        format!("{}/files/{}", self.api_base, id)
    }
}

/// Reject identifiers that cannot be Drive file ids.
///
/// Keeps caller-supplied ids from reshaping the request path.
pub fn validate_id(id: &str) -> AppResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::not_found(format!("Object '{id}' not found")))
    }
}

/// The `multipart/related` framing around an upload's content: the
/// metadata part plus the content part's headers, and the closing
/// delimiter. The content bytes go between the two.
pub fn multipart_related_frame(
    boundary: &str,
    metadata: &serde_json::Value,
    mime_type: &str,
) -> (Bytes, Bytes) {
    let mut head = BytesMut::with_capacity(512);
    head.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    head.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    head.extend_from_slice(metadata.to_string().as_bytes());
    head.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    head.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());

    let tail = Bytes::from(format!("\r\n--{boundary}--\r\n"));
    (head.freeze(), tail)
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::UpstreamUnavailable, "Drive request failed", e)
}

async fn check_status(
    response: reqwest::Response,
    operation: &str,
    id: &str,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND && !id.is_empty() {
        return Err(AppError::not_found(format!("Object '{id}' not found")));
    }
    let body = response.text().await.unwrap_or_default();
    warn!(operation, %status, body = %body, "Drive call failed");
    Err(AppError::upstream(format!(
        "Drive {operation} failed with status {status}"
    )))
}

#[async_trait]
impl ObjectStore for DriveObjectStore {
    fn provider_type(&self) -> &str {
        "drive"
    }

    async fn create(&self, object: NewObject) -> AppResult<String> {
        let token = self.access_token().await?;
        let boundary = format!("docvault-{}", uuid::Uuid::new_v4().simple());
        let metadata = serde_json::json!({ "name": object.name, "mimeType": object.mime_type });
        let (head, tail) = multipart_related_frame(&boundary, &metadata, &object.mime_type);
        let content_length = head.len() as u64 + object.size + tail.len() as u64;

        let body = stream::once(future::ready(Ok::<_, std::io::Error>(head)))
            .chain(object.content)
            .chain(stream::once(future::ready(Ok(tail))));

        let response = self
            .client
            .post(format!("{}/files", self.upload_base))
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .bearer_auth(token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .header(reqwest::header::CONTENT_LENGTH, content_length)
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await
            .map_err(transport_error)?;
        let created: CreatedFile = check_status(response, "create", "")
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        debug!(id = %created.id, name = %object.name, "Created Drive object");
        Ok(created.id)
    }

    async fn metadata(&self, id: &str) -> AppResult<ObjectMeta> {
        validate_id(id)?;
        let token = self.access_token().await?;
        let response = self
            .client
            .get(self.file_url(id))
            .query(&[("fields", "id,name,mimeType")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        let file: DriveFile = check_status(response, "metadata", id)
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        Ok(ObjectMeta {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
        })
    }

    async fn read(&self, id: &str) -> AppResult<ByteStream> {
        validate_id(id)?;
        let token = self.access_token().await?;
        let response = self
            .client
            .get(self.file_url(id))
            .query(&[("alt", "media")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, "read", id).await?;

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(stream))
    }

    async fn set_permission(&self, id: &str, permission: ObjectPermission) -> AppResult<()> {
        validate_id(id)?;
        let token = self.access_token().await?;
        let body = match &permission {
            ObjectPermission::AnyoneReader => PermissionBody {
                role: "reader",
                kind: "anyone",
                email_address: None,
            },
            ObjectPermission::UserReader { email } => PermissionBody {
                role: "reader",
                kind: "user",
                email_address: Some(email.as_str()),
            },
        };

        let response = self
            .client
            .post(format!("{}/permissions", self.file_url(id)))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, "set_permission", id).await?;

        debug!(id, ?permission, "Granted Drive permission");
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        validate_id(id)?;
        let token = self.access_token().await?;
        let response = self
            .client
            .delete(self.file_url(id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response, "delete", id).await?;

        debug!(id, "Deleted Drive object");
        Ok(())
    }
}
