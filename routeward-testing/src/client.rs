use crate::error::ClientError;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use routeward::{HttpMethod, Identity};
use tower::ServiceExt;

/// The HTTP capability an audit drives.
#[async_trait]
pub trait HttpClient: Send {
    /// Issue `method path` against the application and return the status.
    async fn request(&mut self, method: HttpMethod, path: &str) -> Result<StatusCode, ClientError>;

    /// Make every following request on behalf of `identity`.
    fn login_as(&mut self, identity: Identity);
}

/// In-process client dispatching requests straight into an axum [`Router`].
///
/// Logging in attaches the [`Identity`] to each request's extensions, which
/// the session middleware leaves in place.
#[derive(Clone)]
pub struct RouterClient {
    router: Router,
    identity: Option<Identity>,
}

impl RouterClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            identity: None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn logout(&mut self) {
        self.identity = None;
    }
}

#[async_trait]
impl HttpClient for RouterClient {
    async fn request(&mut self, method: HttpMethod, path: &str) -> Result<StatusCode, ClientError> {
        let mut request = Request::builder()
            .method(Method::from(method))
            .uri(path)
            .body(Body::empty())
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        if let Some(identity) = &self.identity {
            request.extensions_mut().insert(identity.clone());
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        tracing::debug!(%method, path, status = %response.status(), "request handled");
        Ok(response.status())
    }

    fn login_as(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }
}
