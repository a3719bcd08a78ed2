//! Shared data model for uploads and deletes.

use std::fmt::{Display, Formatter, Result as FmtResult};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RETRIES, DEFAULT_MAX_SIZE_MB};

/// Storage provider variants.
///
/// Defined in core because it's used by configuration and by the provider
/// factory. Unknown tags parse to `None`; the factory decides the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    S3,
    Catbox,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s3" => Some(ProviderKind::S3),
            "catbox" => Some(ProviderKind::Catbox),
            _ => None,
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProviderKind::S3 => write!(f, "s3"),
            ProviderKind::Catbox => write!(f, "catbox"),
        }
    }
}

/// Category tags accepted by upload options, mapped to MIME prefix sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Videos,
    Documents,
    Audio,
    All,
}

impl FileCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "images" => Some(FileCategory::Images),
            "videos" => Some(FileCategory::Videos),
            "documents" => Some(FileCategory::Documents),
            "audio" => Some(FileCategory::Audio),
            "all" => Some(FileCategory::All),
            _ => None,
        }
    }

    /// MIME prefixes matched by this category. `All` matches everything by
    /// contributing no prefixes at all.
    pub fn mime_prefixes(&self) -> &'static [&'static str] {
        match self {
            FileCategory::Images => &["image/"],
            FileCategory::Videos => &["video/"],
            FileCategory::Documents => &[
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ],
            FileCategory::Audio => &["audio/"],
            FileCategory::All => &[],
        }
    }
}

/// Recognized upload options, merged over defaults per call.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Accepted category tags; empty (or containing `All`) means no filtering.
    pub accepted_types: Vec<FileCategory>,
    /// Maximum file size in megabytes.
    pub max_size_mb: u64,
    /// Additional attempts after the first failure. Only meaningful for the
    /// retry-capable provider.
    pub max_retries: u32,
    /// Whether batch uploads run with bounded parallelism vs strictly
    /// sequentially.
    pub concurrent: bool,
    /// Width of the concurrency window when `concurrent` is true.
    pub max_concurrency: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            accepted_types: vec![FileCategory::Images],
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_retries: DEFAULT_MAX_RETRIES,
            concurrent: true,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl UploadOptions {
    /// Flattened MIME prefixes from the accepted categories.
    pub fn accepted_mime_prefixes(&self) -> Vec<&'static str> {
        self.accepted_types
            .iter()
            .flat_map(|category| category.mime_prefixes().iter().copied())
            .collect()
    }
}

/// A candidate file: raw bytes plus the metadata the validators need.
#[derive(Debug, Clone)]
pub struct FileData {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileData {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Outcome of a single upload.
///
/// Exactly one of `name` (success) or `error` (failure) is set by the
/// constructors; `message` is an optional human-readable success note.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub name: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl UploadResult {
    pub fn success(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: None,
            error: None,
        }
    }

    pub fn success_with_message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            name: None,
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.name.is_some()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate outcome of a batch upload. `results` preserves input order.
#[derive(Debug, Clone, Serialize)]
pub struct MultipleUploadResult {
    pub results: Vec<UploadResult>,
    pub success_count: usize,
    pub failure_count: usize,
    pub success_names: Vec<String>,
}

impl MultipleUploadResult {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            success_count: 0,
            failure_count: 0,
            success_names: Vec::new(),
        }
    }

    /// Tally results. A result with neither name nor error counts toward
    /// neither tally; the constructors make that state unreachable, so this
    /// is defensive only.
    pub fn from_results(results: Vec<UploadResult>) -> Self {
        let success_count = results.iter().filter(|r| r.is_success()).count();
        let failure_count = results.iter().filter(|r| r.is_failure()).count();
        let success_names = results
            .iter()
            .filter_map(|r| r.name.clone())
            .collect::<Vec<_>>();

        Self {
            results,
            success_count,
            failure_count,
            success_names,
        }
    }
}

/// Outcome of a delete call. `message` and `error` are mutually exclusive.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl DeleteResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.message.is_some()
    }
}

/// Ephemeral batch progress, mutated monotonically as files settle and
/// destroyed when the batch finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub current: usize,
    pub total: usize,
    pub current_file_name: Option<String>,
}
