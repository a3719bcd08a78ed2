//! Candidate-file validators.
//!
//! All three checks are pure over the file's bytes and metadata. They return
//! `bool` rather than errors; the providers translate rejections into the
//! literal user-facing messages.

use filedrop_core::{FileCategory, FileData};

/// True if the accepted set imposes no filtering, else true iff the file's
/// MIME type starts with any accepted prefix.
pub fn validate_file_type(file: &FileData, accepted_types: &[FileCategory]) -> bool {
    let prefixes: Vec<&str> = accepted_types
        .iter()
        .flat_map(|category| category.mime_prefixes().iter().copied())
        .collect();

    if prefixes.is_empty() {
        return true;
    }

    prefixes
        .iter()
        .any(|prefix| file.content_type.starts_with(prefix))
}

/// True iff the file fits within `max_size_mb` megabytes.
pub fn validate_file_size(file: &FileData, max_size_mb: u64) -> bool {
    file.size() as u64 <= max_size_mb * 1024 * 1024
}

/// Structural integrity check for images.
///
/// Non-image MIME types pass unconditionally (validation is skipped, not
/// failed). Image types must decode; this catches corrupted or truncated
/// uploads that pass the type and size checks.
pub async fn validate_image_file(file: &FileData) -> bool {
    if !file.is_image() {
        return true;
    }

    let bytes = file.bytes.clone();
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes).is_ok())
        .await
        .unwrap_or(false)
}
