//! Session abstraction.
//!
//! Authentication itself is an external collaborator; the pipeline only needs
//! to ask "who is the current user" before guarded operations and to attach a
//! bearer token to requests against trusted internal endpoints.

use async_trait::async_trait;

/// Opaque session/identity collaborator.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Identifier of the authenticated user, if any.
    async fn current_user(&self) -> Option<String>;
}

/// Fixed session for trusted processes (CLI, tests).
#[derive(Debug, Clone)]
pub struct StaticSession {
    user_id: String,
}

impl StaticSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl SessionStore for StaticSession {
    async fn current_user(&self) -> Option<String> {
        Some(self.user_id.clone())
    }
}

/// Session store that never authenticates.
#[derive(Debug, Clone, Default)]
pub struct AnonymousSession;

#[async_trait]
impl SessionStore for AnonymousSession {
    async fn current_user(&self) -> Option<String> {
        None
    }
}
