//! S3-compatible provider: pre-signed-URL upload flow, parallel deletes.

use std::time::Instant;

use async_trait::async_trait;
use filedrop_core::constants::REQUEST_TIMEOUT;
use filedrop_core::error::UploadErrorResult;
use filedrop_core::{
    Config, DeleteResult, FileData, ProviderKind, UploadError, UploadOptions, UploadResult,
};
use filedrop_processing::compute_sha256;
use futures::future::try_join_all;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::ObjectStoreExt;
use serde::Deserialize;

use crate::traits::{run_validators, StorageProvider};

/// Pre-signed upload descriptor returned by the trusted backend.
#[derive(Debug, Deserialize)]
pub struct PresignedUpload {
    pub key: String,
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// S3-style provider.
///
/// Uploads go through the pre-signed URL endpoint: the backend authenticates
/// the caller, binds the request to the content checksum, and hands back a
/// random storage key plus a time-limited PUT URL. One well-formed request is
/// sufficient, so nothing here retries; a validation or auth failure would
/// fail identically on every attempt.
pub struct S3Provider {
    http: reqwest::Client,
    store: AmazonS3,
    bucket: String,
    presign_endpoint: String,
    auth_token: Option<String>,
}

impl S3Provider {
    pub fn new(config: &Config) -> UploadErrorResult<Self> {
        let bucket = config
            .s3_bucket
            .clone()
            .ok_or_else(|| UploadError::Config("S3_BUCKET_NAME not configured".to_string()))?;
        let region = config
            .s3_region
            .clone()
            .unwrap_or_else(|| "auto".to_string());

        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket.clone())
            .with_region(region);

        if let Some(ref key_id) = config.s3_access_key_id {
            builder = builder.with_access_key_id(key_id.clone());
        }
        if let Some(ref secret) = config.s3_secret_access_key {
            builder = builder.with_secret_access_key(secret.clone());
        }
        if let Some(ref endpoint) = config.s3_endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| UploadError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UploadError::Config(e.to_string()))?;

        let presign_endpoint = format!(
            "{}/api/s3/presigned-url",
            config.app_url.trim_end_matches('/')
        );

        Ok(S3Provider {
            http,
            store,
            bucket,
            presign_endpoint,
            auth_token: config.service_api_key.clone(),
        })
    }

    /// Request a pre-signed upload URL bound to the content checksum.
    ///
    /// Non-success responses surface the backend's message, or a generic
    /// status line when the body is unparseable. Not retried: the backend
    /// either authorizes the upload or it doesn't.
    async fn request_presigned_url(
        &self,
        content_type: &str,
        size: usize,
        checksum: &str,
    ) -> UploadErrorResult<PresignedUpload> {
        let mut request = self.http.post(&self.presign_endpoint).json(&serde_json::json!({
            "type": content_type,
            "size": size,
            "checksum": checksum,
        }));
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("Request failed with status: {}", status.as_u16()));
            return Err(UploadError::Server(message));
        }

        response
            .json::<PresignedUpload>()
            .await
            .map_err(|e| UploadError::Server(e.to_string()))
    }

    /// Direct PUT of the raw bytes to the pre-signed URL.
    async fn put_object(&self, url: &str, file: &FileData) -> UploadErrorResult<()> {
        let response = self
            .http
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Server(format!(
                "Request failed with status: {}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    async fn try_upload(&self, file: &FileData) -> UploadErrorResult<String> {
        let checksum = compute_sha256(&file.bytes).await;
        let presigned = self
            .request_presigned_url(&file.content_type, file.size(), &checksum)
            .await?;
        self.put_object(&presigned.url, file).await?;
        Ok(presigned.name)
    }
}

#[async_trait]
impl StorageProvider for S3Provider {
    async fn upload_file(&self, file: &FileData, options: &UploadOptions) -> UploadResult {
        if let Some(rejection) = run_validators(file, options).await {
            return rejection;
        }

        let start = Instant::now();
        match self.try_upload(file).await {
            Ok(name) => {
                tracing::info!(
                    key = %name,
                    size_bytes = file.size(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "s3 upload successful"
                );
                UploadResult::success(name)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    size_bytes = file.size(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "s3 upload failed"
                );
                UploadResult::failure(e.to_string())
            }
        }
    }

    async fn delete_files(&self, identifiers: &[String]) -> DeleteResult {
        let start = Instant::now();
        let deletes = identifiers.iter().map(|key| {
            let location = Path::from(key.as_str());
            async move { self.store.delete(&location).await }
        });

        match try_join_all(deletes).await {
            Ok(_) => {
                tracing::info!(
                    bucket = %self.bucket,
                    count = identifiers.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "s3 delete successful"
                );
                DeleteResult::success(format!(
                    "{} file(s) deleted successfully!",
                    identifiers.len()
                ))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    count = identifiers.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "s3 delete failed"
                );
                DeleteResult::failure(e.to_string())
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::S3
    }
}
