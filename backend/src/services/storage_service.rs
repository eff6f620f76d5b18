//! Client for the object-storage collaborator.
//!
//! Uploads a byte stream to an S3-compatible bucket with a SigV4-signed PUT
//! and returns the object's public locator. Requests carry an explicit
//! timeout; failures surface as upload errors without echoing provider
//! payloads back to the client.

use crate::config::{Config, StorageConfig};
use crate::errors::{ServiceError, ServiceResult};
use chrono::Utc;
use ring::{digest, hmac};
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Locator of a stored object
#[derive(Debug, Serialize)]
pub struct UploadedObject {
    pub url: String,
    pub key: String,
}

pub struct StorageService {
    client: reqwest::Client,
    storage: StorageConfig,
}

impl StorageService {
    /// Create a storage client from loaded configuration
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        let storage = config.storage.clone().ok_or_else(|| {
            ServiceError::configuration(
                "object storage credentials not set (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_BUCKET_NAME)",
            )
        })?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ServiceError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(StorageService { client, storage })
    }

    /// Uploads the bytes under a sanitized, timestamped key.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ServiceResult<UploadedObject> {
        let key = format!(
            "uploads/{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(file_name)
        );

        let host = format!(
            "{}.s3.{}.amazonaws.com",
            self.storage.bucket, self.storage.region
        );
        let url = format!("https://{}/{}", host, key);

        let now = Utc::now();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let payload_hash = sha256_hex(&bytes);

        let authorization = sign_put_request(
            &self.storage,
            &host,
            &key,
            content_type,
            &payload_hash,
            &amz_date,
            &date,
        );

        let response = self
            .client
            .put(&url)
            .header("authorization", authorization)
            .header("content-type", content_type)
            .header("x-amz-content-sha256", &payload_hash)
            .header("x-amz-date", &amz_date)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ServiceError::upload(format!("Storage request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::upload(format!(
                "Storage returned status {}",
                status
            )));
        }

        tracing::info!("Uploaded {} to bucket {}", key, self.storage.bucket);
        Ok(UploadedObject { url, key })
    }
}

/// Keeps letters, digits, dots and dashes; everything else becomes `_`.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest::digest(&digest::SHA256, data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

/// Builds the SigV4 Authorization header for a PUT of the given object.
fn sign_put_request(
    storage: &StorageConfig,
    host: &str,
    key: &str,
    content_type: &str,
    payload_hash: &str,
    amz_date: &str,
    date: &str,
) -> String {
    const SIGNED_HEADERS: &str = "content-type;host;x-amz-content-sha256;x-amz-date";

    let canonical_request = format!(
        "PUT\n/{key}\n\ncontent-type:{content_type}\nhost:{host}\n\
         x-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n\n\
         {SIGNED_HEADERS}\n{payload_hash}"
    );

    let scope = format!("{date}/{}/s3/aws4_request", storage.region);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let secret = format!("AWS4{}", storage.secret_access_key);
    let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, storage.region.as_bytes());
    let k_service = hmac_sha256(&k_region, b"s3");
    let k_signing = hmac_sha256(&k_service, b"aws4_request");
    let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

    format!(
        "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        storage.access_key_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> StorageConfig {
        StorageConfig {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            region: "us-east-1".to_string(),
            bucket: "my-bucket".to_string(),
        }
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(
            sanitize_file_name("my report (final).pdf"),
            "my_report__final_.pdf"
        );
        assert_eq!(sanitize_file_name("photo-1.jpg"), "photo-1.jpg");
    }

    #[test]
    fn signature_is_deterministic_and_well_formed() {
        let a = sign_put_request(
            &storage(),
            "my-bucket.s3.us-east-1.amazonaws.com",
            "uploads/1-file.txt",
            "text/plain",
            &sha256_hex(b"hello"),
            "20240601T120000Z",
            "20240601",
        );
        let b = sign_put_request(
            &storage(),
            "my-bucket.s3.us-east-1.amazonaws.com",
            "uploads/1-file.txt",
            "text/plain",
            &sha256_hex(b"hello"),
            "20240601T120000Z",
            "20240601",
        );
        assert_eq!(a, b);
        assert!(a.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240601/us-east-1/s3/aws4_request"));

        // 64 hex chars of HMAC-SHA256 output
        let signature = a.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn missing_credentials_are_a_configuration_error() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 0,
            storage: None,
            gemini_api_key: None,
        };
        let err = StorageService::from_config(&config).err().unwrap();
        assert!(matches!(err, ServiceError::Configuration { .. }));
    }
}
