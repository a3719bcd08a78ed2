//! Filedrop Storage Library
//!
//! This crate provides the storage-provider abstraction and its two variants.
//! Both variants share one contract (`upload_file`, `delete_files`) so the
//! orchestrators stay variant-agnostic:
//!
//! - **S3**: pre-signed-URL flow against an S3-compatible object store. One
//!   well-formed request suffices, so nothing is retried.
//! - **Catbox**: multipart POST to a paste-bin-style host that intermittently
//!   rejects large or slow uploads; the client compensates with exponential
//!   backoff and progressively stronger image recompression on retry.

pub mod catbox;
pub mod factory;
pub mod retry;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use catbox::{CatboxProvider, CatboxTransport};
pub use factory::create_provider;
pub use retry::RetryPolicy;
pub use s3::S3Provider;
pub use traits::StorageProvider;
