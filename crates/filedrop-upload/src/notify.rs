//! User-facing lifecycle notifications.
//!
//! The orchestrators surface loading/settled messages through this trait so
//! the frontend surface (toast, console, nothing) stays a caller concern.

/// Sink for upload lifecycle messages.
pub trait Notifier: Send + Sync {
    fn loading(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that writes through structured logging.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn loading(&self, message: &str) {
        tracing::info!(message, "upload pending");
    }

    fn success(&self, message: &str) {
        tracing::info!(message, "upload settled");
    }

    fn error(&self, message: &str) {
        tracing::error!(message, "upload settled");
    }
}

/// Silent notifier.
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn loading(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
