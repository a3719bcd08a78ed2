//! Filedrop Upload Library
//!
//! Orchestration over the storage providers: single-file upload with error
//! normalization, batch upload with bounded concurrency and progress
//! reporting, and the session-guarded delete flow.

pub mod delete;
pub mod notify;
pub mod uploader;

pub use delete::{delete_files, delete_files_with};
pub use notify::{Notifier, NullNotifier, TracingNotifier};
pub use uploader::{ProviderFactory, Uploader};
