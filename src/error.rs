use thiserror::Error;

pub type Result<T> = std::result::Result<T, RoutewardError>;

#[derive(Debug, Error)]
pub enum RoutewardError {
    #[error("Controller not registered: {identifier}")]
    ControllerNotRegistered { identifier: String },

    #[error("Controller registered twice: {identifier}")]
    DuplicateController { identifier: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for RoutewardError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            RoutewardError::ControllerNotRegistered { .. } => axum::http::StatusCode::NOT_FOUND,
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self, "request failed");
        (status, self.to_string()).into_response()
    }
}
