//! Session-guarded delete orchestration.

use filedrop_core::{Config, DeleteResult, SessionStore, UploadError};
use filedrop_storage::create_provider;
use std::sync::Arc;

use crate::uploader::ProviderFactory;

/// Delete stored files through the active provider.
///
/// The session is checked before anything else; an unauthenticated caller
/// gets a typed error and no deletion is attempted. Failures during provider
/// resolution or execution are normalized, never propagated.
pub async fn delete_files(
    config: &Config,
    session: &dyn SessionStore,
    identifiers: &[String],
) -> DeleteResult {
    let config = config.clone();
    let factory: ProviderFactory = Arc::new(move || create_provider(&config));
    delete_files_with(&factory, session, identifiers).await
}

/// Like [`delete_files`] but with an injected provider factory.
pub async fn delete_files_with(
    factory: &ProviderFactory,
    session: &dyn SessionStore,
    identifiers: &[String],
) -> DeleteResult {
    let Some(user) = session.current_user().await else {
        return DeleteResult::failure(UploadError::Auth.to_string());
    };

    if identifiers.is_empty() {
        return DeleteResult::failure("No files to delete");
    }

    tracing::debug!(user = %user, count = identifiers.len(), "delete requested");

    match factory() {
        Ok(provider) => provider.delete_files(identifiers).await,
        Err(e) => DeleteResult::failure(e.to_string()),
    }
}
