//! Shared constants for the upload pipeline.

use std::time::Duration;

/// Default cap on file size, in megabytes.
pub const DEFAULT_MAX_SIZE_MB: u64 = 5;

/// Default number of additional attempts after the first failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default width of the batch concurrency window.
pub const DEFAULT_MAX_CONCURRENCY: usize = 3;

/// Timeout applied to every network operation (presign request, object PUT,
/// multipart POST, delete commands).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Length in bytes of randomly generated storage keys (hex-encoded on use).
pub const STORAGE_KEY_BYTES: usize = 32;

/// Public base URL for files stored on the Catbox host.
pub const CATBOX_FILE_BASE_URL: &str = "https://files.catbox.moe/";

/// Path served for the placeholder avatar when a record holds the
/// sentinel name `default`.
pub const DEFAULT_AVATAR_PATH: &str = "/images/pfp.png";
