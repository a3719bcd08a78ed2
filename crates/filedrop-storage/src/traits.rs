//! Storage provider abstraction.

use async_trait::async_trait;
use filedrop_core::{
    DeleteResult, FileData, ProviderKind, UploadError, UploadOptions, UploadResult,
};
use filedrop_processing::{validate_file_size, validate_file_type, validate_image_file};

/// Storage provider contract.
///
/// Providers own no state beyond injected credentials/endpoints and are
/// selected fresh from configuration for every upload or delete, so the
/// active variant always reflects current configuration.
///
/// Both operations convert every internal failure into the typed result
/// shape; they never return errors.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Validate and upload one file, returning the stored name on success.
    async fn upload_file(&self, file: &FileData, options: &UploadOptions) -> UploadResult;

    /// Delete previously stored files by identifier.
    async fn delete_files(&self, identifiers: &[String]) -> DeleteResult;

    /// The provider variant, for logging and diagnostics.
    fn kind(&self) -> ProviderKind;
}

/// Run the shared validation sequence, short-circuiting with the typed
/// rejection on the first failure. Validation failures are never retried.
pub(crate) async fn run_validators(
    file: &FileData,
    options: &UploadOptions,
) -> Option<UploadResult> {
    if !validate_file_type(file, &options.accepted_types) {
        return Some(rejection("Invalid file type".to_string()));
    }

    if !validate_file_size(file, options.max_size_mb) {
        return Some(rejection(format!(
            "File too large, max file size is {}mb",
            options.max_size_mb
        )));
    }

    if !validate_image_file(file).await {
        return Some(rejection("Image file is corrupted or invalid".to_string()));
    }

    None
}

fn rejection(message: String) -> UploadResult {
    UploadResult::failure(UploadError::Validation(message).to_string())
}
