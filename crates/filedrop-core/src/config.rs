//! Configuration module
//!
//! Environment-driven configuration for provider selection, storage
//! credentials, and trusted endpoints. Presence of required credentials for
//! the selected provider is checked once via [`Config::validate`] so a
//! misconfigured process fails at startup rather than mid-upload.

use std::env;

use crate::types::ProviderKind;

/// Upload pipeline configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Raw provider tag (`s3` | `catbox`); unknown tags fall back at selection
    /// time, not here.
    pub storage_provider: String,
    /// Base URL of the trusted backend that issues pre-signed upload URLs.
    pub app_url: String,
    // S3-compatible object store
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (R2, MinIO, Spaces, ...).
    pub s3_endpoint: Option<String>,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    /// Public base URL for serving stored objects.
    pub s3_public_base_url: Option<String>,
    // Catbox-style remote host
    pub catbox_api: Option<String>,
    pub catbox_user_hash: Option<String>,
    /// Bearer token for service-to-service calls against internal endpoints.
    pub service_api_key: Option<String>,
}

fn opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(Config {
            storage_provider: env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "s3".to_string()),
            app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            s3_bucket: opt("S3_BUCKET_NAME"),
            s3_region: opt("S3_REGION"),
            s3_endpoint: opt("S3_ENDPOINT"),
            s3_access_key_id: opt("S3_ACCESS_KEY_ID"),
            s3_secret_access_key: opt("S3_SECRET_ACCESS_KEY"),
            s3_public_base_url: opt("S3_PUBLIC_BASE_URL"),
            catbox_api: opt("CATBOX_API"),
            catbox_user_hash: opt("CATBOX_USER_HASH"),
            service_api_key: opt("SERVICE_API_KEY"),
        })
    }

    /// Parsed provider tag; `None` for unrecognized tags.
    pub fn provider_kind(&self) -> Option<ProviderKind> {
        ProviderKind::parse(&self.storage_provider)
    }

    /// Fail fast when a required credential for the selected provider is
    /// absent. Unknown tags validate against the S3 requirements since the
    /// selector falls back to S3.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.provider_kind() {
            Some(ProviderKind::Catbox) => {
                if self.catbox_api.is_none() {
                    anyhow::bail!("CATBOX_API must be set when STORAGE_PROVIDER=catbox");
                }
                Ok(())
            }
            _ => {
                let missing: Vec<&str> = [
                    ("S3_BUCKET_NAME", self.s3_bucket.is_some()),
                    ("S3_ACCESS_KEY_ID", self.s3_access_key_id.is_some()),
                    ("S3_SECRET_ACCESS_KEY", self.s3_secret_access_key.is_some()),
                ]
                .iter()
                .filter(|(_, present)| !present)
                .map(|(name, _)| *name)
                .collect();

                if !missing.is_empty() {
                    anyhow::bail!(
                        "missing required S3 configuration: {}",
                        missing.join(", ")
                    );
                }
                Ok(())
            }
        }
    }
}
