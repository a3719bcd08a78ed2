//! Catbox-style provider: multipart upload with retry-and-degrade.
//!
//! The remote host has no pre-authorization step and intermittently rejects
//! large or slow uploads, so the client compensates: transport failures back
//! off exponentially, and each retry of an image re-encodes it at a lower
//! quality before resending.

use async_trait::async_trait;
use filedrop_core::constants::REQUEST_TIMEOUT;
use filedrop_core::error::UploadErrorResult;
use filedrop_core::{
    Config, DeleteResult, FileData, ProviderKind, UploadError, UploadOptions, UploadResult,
};
use filedrop_processing::{compress_image, extract_filename_from_url, is_valid_url};
use std::sync::Arc;

use crate::retry::RetryPolicy;
use crate::traits::{run_validators, StorageProvider};

/// Wire-level operations against the remote host.
///
/// Split from the provider so the retry loop can be exercised without real
/// network calls.
#[async_trait]
pub trait CatboxTransport: Send + Sync {
    /// POST one file; returns the URL the host responded with.
    async fn upload(&self, file: &FileData) -> UploadErrorResult<String>;

    /// Batch-delete by bare filenames. The remote API reports no
    /// partial-failure granularity.
    async fn delete(&self, filenames: &[String]) -> UploadErrorResult<()>;
}

/// reqwest-backed transport speaking the host's multipart form protocol.
pub struct HttpCatboxTransport {
    http: reqwest::Client,
    api_url: String,
    user_hash: String,
}

impl HttpCatboxTransport {
    pub fn new(api_url: String, user_hash: String) -> UploadErrorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UploadError::Config(e.to_string()))?;
        Ok(Self {
            http,
            api_url,
            user_hash,
        })
    }
}

#[async_trait]
impl CatboxTransport for HttpCatboxTransport {
    async fn upload(&self, file: &FileData) -> UploadErrorResult<String> {
        let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("reqtype", "fileupload")
            .text("userhash", self.user_hash.clone())
            .part("fileToUpload", part);

        let response = self
            .http
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                format!("Upload failed with status: {}", status.as_u16())
            } else {
                body.trim().to_string()
            };
            return Err(UploadError::Server(message));
        }

        Ok(body.trim().to_string())
    }

    async fn delete(&self, filenames: &[String]) -> UploadErrorResult<()> {
        let form = reqwest::multipart::Form::new()
            .text("reqtype", "deletefiles")
            .text("userhash", self.user_hash.clone())
            .text("files", filenames.join(" "));

        let response = self
            .http
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Server(format!(
                "Delete failed with status: {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

/// Catbox-style provider with retry-and-degrade upload semantics.
pub struct CatboxProvider {
    transport: Arc<dyn CatboxTransport>,
    policy: RetryPolicy,
}

impl CatboxProvider {
    pub fn new(config: &Config) -> UploadErrorResult<Self> {
        let api_url = config
            .catbox_api
            .clone()
            .ok_or_else(|| UploadError::Config("CATBOX_API not configured".to_string()))?;
        let user_hash = config.catbox_user_hash.clone().unwrap_or_default();

        Ok(Self {
            transport: Arc::new(HttpCatboxTransport::new(api_url, user_hash)?),
            policy: RetryPolicy::default(),
        })
    }

    /// Build with an injected transport and schedule (tests).
    pub fn with_transport(transport: Arc<dyn CatboxTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Best-effort delete of whatever identifier the host returned for a
    /// rejected upload, so an orphaned remote object doesn't linger.
    async fn cleanup_orphan(&self, identifier: &str) {
        if let Some(name) = extract_filename_from_url(identifier, false) {
            if let Err(e) = self.transport.delete(&[name]).await {
                tracing::debug!(error = %e, "orphan cleanup failed");
            }
        }
    }
}

#[async_trait]
impl StorageProvider for CatboxProvider {
    async fn upload_file(&self, file: &FileData, options: &UploadOptions) -> UploadResult {
        if let Some(rejection) = run_validators(file, options).await {
            return rejection;
        }

        let policy = self.policy.for_attempts(options.max_retries);
        let mut current = file.clone();
        let mut last_error = String::new();

        for attempt in 0..=policy.max_retries() {
            // Each retry recompresses the *original* image at a lower
            // quality, not the previous attempt's output.
            if attempt > 0 && file.is_image() {
                let quality = 0.9 - 0.1 * attempt as f32;
                current = compress_image(file, quality).await;
            }

            match self.transport.upload(&current).await {
                Ok(url) => {
                    let url = url.trim().to_string();
                    if url.is_empty() {
                        self.cleanup_orphan(&url).await;
                        last_error =
                            "Server returned empty URL - file may be corrupted".to_string();
                        continue;
                    }
                    if !is_valid_url(&url) {
                        self.cleanup_orphan(&url).await;
                        last_error = "Server returned invalid URL format".to_string();
                        continue;
                    }

                    let name =
                        extract_filename_from_url(&url, false).unwrap_or_else(|| url.clone());
                    tracing::info!(
                        attempt,
                        name = %name,
                        size_bytes = current.size(),
                        "catbox upload successful"
                    );
                    return UploadResult::success_with_message(name, "File uploaded!");
                }
                Err(UploadError::Server(message)) => {
                    tracing::warn!(attempt, error = %message, "catbox rejected upload");
                    last_error = message;
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(attempt, error = %last_error, "catbox transport failure");
                    if attempt < policy.max_retries() {
                        tokio::time::sleep(policy.backoff(attempt)).await;
                    }
                }
            }
        }

        if last_error.is_empty() {
            last_error = "Upload failed after multiple attempts".to_string();
        }
        UploadResult::failure(last_error)
    }

    async fn delete_files(&self, identifiers: &[String]) -> DeleteResult {
        let mut filenames = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            match extract_filename_from_url(identifier, false) {
                Some(name) => filenames.push(name),
                None => {
                    return DeleteResult::failure(format!("Invalid URL format: {}", identifier))
                }
            }
        }

        if filenames.is_empty() {
            return DeleteResult::failure("No valid file names found in URLs");
        }

        match self.transport.delete(&filenames).await {
            Ok(()) => {
                tracing::info!(count = filenames.len(), "catbox delete successful");
                DeleteResult::success(format!("{} file(s) deleted successfully!", filenames.len()))
            }
            Err(e) => {
                tracing::error!(error = %e, count = filenames.len(), "catbox delete failed");
                DeleteResult::failure(e.to_string())
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Catbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Transport double that replays a script of responses and records what
    /// the provider sent.
    struct ScriptedTransport {
        responses: Mutex<VecDeque<UploadErrorResult<String>>>,
        upload_sizes: Mutex<Vec<usize>>,
        deletes: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<UploadErrorResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                upload_sizes: Mutex::new(Vec::new()),
                deletes: Mutex::new(Vec::new()),
            })
        }

        fn attempts(&self) -> usize {
            self.upload_sizes.lock().expect("lock poisoned").len()
        }

        fn sizes(&self) -> Vec<usize> {
            self.upload_sizes.lock().expect("lock poisoned").clone()
        }

        fn deletes(&self) -> Vec<Vec<String>> {
            self.deletes.lock().expect("lock poisoned").clone()
        }
    }

    #[async_trait]
    impl CatboxTransport for ScriptedTransport {
        async fn upload(&self, file: &FileData) -> UploadErrorResult<String> {
            self.upload_sizes
                .lock()
                .expect("lock poisoned")
                .push(file.size());
            self.responses
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(UploadError::Server("script exhausted".to_string())))
        }

        async fn delete(&self, filenames: &[String]) -> UploadErrorResult<()> {
            self.deletes
                .lock()
                .expect("lock poisoned")
                .push(filenames.to_vec());
            Ok(())
        }
    }

    fn zero_backoff() -> RetryPolicy {
        RetryPolicy::new(3).with_base_delay(Duration::ZERO)
    }

    fn noisy_jpeg() -> FileData {
        // Encoded at maximum quality so every degraded retry shrinks it.
        let img = image::RgbImage::from_fn(256, 256, |x, y| {
            let n = ((x * 31 + y * 17) % 251) as u8;
            image::Rgb([(x % 256) as u8, (y % 256) as u8, n])
        });
        let mut out = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 100);
        encoder.encode_image(&img).unwrap();
        FileData::new("photo.jpg", "image/jpeg", Bytes::from(out))
    }

    #[tokio::test]
    async fn test_retry_and_degrade() {
        let transport = ScriptedTransport::new(vec![
            Err(UploadError::Server("Upload failed on server".to_string())),
            Err(UploadError::Server("Upload failed on server".to_string())),
            Ok("https://files.catbox.moe/abc123.jpg".to_string()),
        ]);
        let provider = CatboxProvider::with_transport(transport.clone(), zero_backoff());

        let result = provider
            .upload_file(&noisy_jpeg(), &UploadOptions::default())
            .await;

        assert_eq!(transport.attempts(), 3);
        let sizes = transport.sizes();
        // Attempts 2 and 3 carry recompressed payloads.
        assert!(sizes[1] < sizes[0]);
        assert!(sizes[2] < sizes[0]);
        assert_eq!(result.name.as_deref(), Some("abc123.jpg"));
        assert_eq!(result.message.as_deref(), Some("File uploaded!"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_last_error() {
        let transport = ScriptedTransport::new(vec![
            Err(UploadError::Transport("connection reset".to_string())),
            Err(UploadError::Transport("connection reset".to_string())),
            Err(UploadError::Transport("timed out".to_string())),
        ]);
        let policy = RetryPolicy::new(2).with_base_delay(Duration::ZERO);
        let provider = CatboxProvider::with_transport(transport.clone(), policy);

        let options = UploadOptions {
            max_retries: 2,
            ..Default::default()
        };
        let result = provider.upload_file(&noisy_jpeg(), &options).await;

        assert_eq!(transport.attempts(), 3);
        assert_eq!(result.error.as_deref(), Some("timed out"));
        assert!(result.name.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_triggers_cleanup_then_retry() {
        let transport = ScriptedTransport::new(vec![
            Ok("bogus-host/zzz.png".to_string()),
            Ok("https://files.catbox.moe/ok.png".to_string()),
        ]);
        let provider = CatboxProvider::with_transport(transport.clone(), zero_backoff());

        let result = provider
            .upload_file(&noisy_jpeg(), &UploadOptions::default())
            .await;

        assert_eq!(transport.attempts(), 2);
        // The rejected identifier was cleaned up best-effort before retrying.
        assert_eq!(transport.deletes(), vec![vec!["zzz.png".to_string()]]);
        assert_eq!(result.name.as_deref(), Some("ok.png"));
    }

    #[tokio::test]
    async fn test_validation_failure_short_circuits() {
        let transport = ScriptedTransport::new(vec![]);
        let provider = CatboxProvider::with_transport(transport.clone(), zero_backoff());

        let file = FileData::new("notes.txt", "text/plain", Bytes::from_static(b"hi"));
        let result = provider.upload_file(&file, &UploadOptions::default()).await;

        assert_eq!(transport.attempts(), 0);
        assert_eq!(result.error.as_deref(), Some("Invalid file type"));
    }

    #[tokio::test]
    async fn test_delete_derives_filenames() {
        let transport = ScriptedTransport::new(vec![]);
        let provider = CatboxProvider::with_transport(transport.clone(), zero_backoff());

        let result = provider
            .delete_files(&[
                "https://files.catbox.moe/a.png".to_string(),
                "https://files.catbox.moe/b.png".to_string(),
            ])
            .await;

        assert_eq!(
            transport.deletes(),
            vec![vec!["a.png".to_string(), "b.png".to_string()]]
        );
        assert_eq!(
            result.message.as_deref(),
            Some("2 file(s) deleted successfully!")
        );
    }

    #[tokio::test]
    async fn test_delete_rejects_underivable_identifier() {
        let transport = ScriptedTransport::new(vec![]);
        let provider = CatboxProvider::with_transport(transport.clone(), zero_backoff());

        let result = provider
            .delete_files(&["https://files.catbox.moe/a.png".to_string(), "".to_string()])
            .await;

        assert!(transport.deletes().is_empty());
        assert_eq!(result.error.as_deref(), Some("Invalid URL format: "));
    }
}
