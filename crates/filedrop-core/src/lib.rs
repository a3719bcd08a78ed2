//! Filedrop Core Library
//!
//! This crate provides the shared types, configuration, error taxonomy, and
//! session abstraction used by all filedrop components.

pub mod config;
pub mod constants;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::UploadError;
pub use session::{AnonymousSession, SessionStore, StaticSession};
pub use types::{
    DeleteResult, FileCategory, FileData, MultipleUploadResult, ProviderKind, UploadOptions,
    UploadProgress, UploadResult,
};
