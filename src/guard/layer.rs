use crate::common::found;
use crate::guard::{Guard, GuardError};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer for Guards
///
/// Unauthorized requests are answered with `302 Found` to `login_path`,
/// forbidden ones with `403 Forbidden`.
#[derive(Clone)]
pub struct GuardLayer {
    guards: Arc<Vec<Arc<dyn Guard>>>,
    login_path: Arc<str>,
}

impl GuardLayer {
    pub fn new(guards: Vec<Arc<dyn Guard>>, login_path: impl Into<String>) -> Self {
        Self {
            guards: Arc::new(guards),
            login_path: Arc::from(login_path.into()),
        }
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardMiddleware {
            inner,
            guards: self.guards.clone(),
            login_path: self.login_path.clone(),
        }
    }
}

#[derive(Clone)]
pub struct GuardMiddleware<S> {
    inner: S,
    guards: Arc<Vec<Arc<dyn Guard>>>,
    login_path: Arc<str>,
}

impl<S> Service<Request<Body>> for GuardMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let guards = self.guards.clone();
        let login_path = self.login_path.clone();
        // The polled service is the one that must handle the call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            for guard in guards.iter() {
                if let Err(e) = guard.can_activate(&parts).await {
                    tracing::debug!(uri = %parts.uri, error = %e, "guard denied request");
                    return Ok(deny(e, &login_path));
                }
            }
            inner.call(Request::from_parts(parts, body)).await
        })
    }
}

fn deny(error: GuardError, login_path: &str) -> Response {
    match error {
        GuardError::Unauthorized(_) => found(login_path),
        GuardError::Forbidden(message) => (StatusCode::FORBIDDEN, message).into_response(),
    }
}
