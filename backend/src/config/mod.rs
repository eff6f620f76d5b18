//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, the session-signing secret, and the
//! credentials for the external object-storage and summarization services.

use anyhow::{Context, Result};
use std::env;

/// Credentials for the S3-compatible object storage collaborator.
///
/// Absent when the deployment does not configure uploads; the upload
/// endpoint then answers with a configuration error instead of failing
/// opaquely mid-request.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub server_port: u16,
    pub storage: Option<StorageConfig>,
    pub gemini_api_key: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        // Token expiry and the session cookie Max-Age share this value.
        let jwt_expires_in_seconds = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let storage = match (
            env::var("AWS_ACCESS_KEY_ID"),
            env::var("AWS_SECRET_ACCESS_KEY"),
            env::var("AWS_BUCKET_NAME"),
        ) {
            (Ok(access_key_id), Ok(secret_access_key), Ok(bucket)) => Some(StorageConfig {
                access_key_id,
                secret_access_key,
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                bucket,
            }),
            _ => None,
        };

        let gemini_api_key = env::var("GEMINI_API_KEY").ok();

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            server_port,
            storage,
            gemini_api_key,
        })
    }
}
