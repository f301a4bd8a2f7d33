use crate::security::Identity;
use async_trait::async_trait;
use axum::http::request::Parts;

mod layer;

pub use layer::{GuardLayer, GuardMiddleware};

/// Standard Result type for Guard
/// Ok(()) means allowed
/// Err(GuardError) means denied
pub type GuardResult = Result<(), GuardError>;

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// The Guard trait
/// Implement this to protect routes
#[async_trait]
pub trait Guard: Send + Sync + 'static {
    async fn can_activate(&self, parts: &Parts) -> GuardResult;
}

/// Requires an authenticated [`Identity`] carrying `role`.
pub struct RoleGuard {
    role: String,
}

impl RoleGuard {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

#[async_trait]
impl Guard for RoleGuard {
    async fn can_activate(&self, parts: &Parts) -> GuardResult {
        let identity = parts
            .extensions
            .get::<Identity>()
            .ok_or_else(|| GuardError::Unauthorized("authentication required".to_string()))?;

        if identity.has_role(&self.role) {
            Ok(())
        } else {
            Err(GuardError::Forbidden(format!(
                "{} lacks {}",
                identity.identifier, self.role
            )))
        }
    }
}
