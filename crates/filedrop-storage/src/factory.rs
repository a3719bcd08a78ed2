//! Provider selection from configuration.

use std::sync::Arc;

use filedrop_core::error::UploadErrorResult;
use filedrop_core::{Config, ProviderKind};

use crate::catbox::CatboxProvider;
use crate::s3::S3Provider;
use crate::traits::StorageProvider;

/// Construct the storage provider matching the configured tag.
///
/// An unrecognized tag logs a warning and falls back to the S3 variant rather
/// than failing; missing credentials for the resolved variant is still a
/// configuration error.
pub fn create_provider(config: &Config) -> UploadErrorResult<Arc<dyn StorageProvider>> {
    let kind = match config.provider_kind() {
        Some(kind) => kind,
        None => {
            tracing::warn!(
                provider = %config.storage_provider,
                "unknown storage provider, defaulting to s3"
            );
            ProviderKind::S3
        }
    };

    match kind {
        ProviderKind::S3 => Ok(Arc::new(S3Provider::new(config)?)),
        ProviderKind::Catbox => Ok(Arc::new(CatboxProvider::new(config)?)),
    }
}
