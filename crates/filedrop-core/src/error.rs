//! Error taxonomy for the upload pipeline.
//!
//! Errors are classified by how the pipeline reacts to them: validation
//! failures are never retried, transport failures are retried only by the
//! retry-capable provider, server failures are retried only where a retry is
//! explicitly designed in, configuration problems fall back or fail fast, and
//! auth failures fail fast. Provider and orchestrator boundaries convert these
//! into the typed result shapes (`UploadResult` / `DeleteResult`) rather than
//! propagating them, so callers only ever inspect results.

/// Classified upload/delete pipeline error.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Bad type, size, or corrupt payload. Never retried.
    #[error("{0}")]
    Validation(String),

    /// Network or timeout failure. Retried with backoff only by the
    /// retry-capable provider.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response from an internal or remote endpoint.
    #[error("{0}")]
    Server(String),

    /// Missing or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing session on a guarded operation.
    #[error("Not authenticated")]
    Auth,
}

/// Result alias for fallible pipeline internals.
pub type UploadErrorResult<T> = Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    // The Display output is what callers see in result `error` fields, so
    // the wording is part of the contract.
    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            UploadError::Validation("Invalid file type".to_string()).to_string(),
            "Invalid file type"
        );
        assert_eq!(UploadError::Auth.to_string(), "Not authenticated");
        assert_eq!(
            UploadError::Config("CATBOX_API not configured".to_string()).to_string(),
            "Configuration error: CATBOX_API not configured"
        );
        assert_eq!(
            UploadError::Transport("timed out".to_string()).to_string(),
            "timed out"
        );
    }
}
