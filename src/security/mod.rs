//! Authenticated identity and the session glue that carries it.

use axum::{extract::Request, middleware::Next, response::Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session key the identity is stored under.
pub const IDENTITY_KEY: &str = "identity";

/// The authenticated user attached to a request.
///
/// Handlers and guards read it from request extensions. Test clients may
/// insert it directly to act as a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i32,
    pub identifier: String,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn new(user_id: i32, identifier: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            user_id,
            identifier: identifier.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Middleware copying the session identity into request extensions.
///
/// An identity already present in the extensions wins over the session.
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(routes)
///     .layer(axum::middleware::from_fn(load_identity))
///     .layer(SessionManagerLayer::new(MemoryStore::default()));
/// ```
pub async fn load_identity(session: Session, mut request: Request, next: Next) -> Response {
    if request.extensions().get::<Identity>().is_none() {
        match session.get::<Identity>(IDENTITY_KEY).await {
            Ok(Some(identity)) => {
                request.extensions_mut().insert(identity);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to read identity from session"),
        }
    }
    next.run(request).await
}
