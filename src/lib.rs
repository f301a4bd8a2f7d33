//! # Routeward
//!
//! Controller routing, route smoke-auditing and user administration for axum
//! admin applications.
//!
//! ## Features
//!
//! - **Controller-based Routing**: `#[controller]`/`#[routes]` generate an axum
//!   `Router` and a static route table per controller
//! - **Controller Registry**: explicit identifier -> route table mapping, the
//!   seam the route auditor in `routeward-testing` resolves controllers through
//! - **Guards**: tower layer redirecting anonymous users to the login page
//! - **User Administration**: sea-orm user repository and an interactive
//!   console command
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use routeward::prelude::*;
//!
//! #[controller(path = "/user")]
//! pub struct UserController {
//!     users: Arc<dyn UserRepository>,
//! }
//!
//! #[routes]
//! impl UserController {
//!     #[get("/", name = "user_index")]
//!     async fn index(&self) -> Result<Response> {
//!         // ...
//!     }
//!
//!     #[get("/{id}", name = "user_edit")]
//!     async fn edit(&self, #[param] id: i32) -> Result<Response> {
//!         // ...
//!     }
//! }
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register::<UserController>()?;
//!
//! let app: Router = UserController::router(Arc::new(controller));
//! ```

pub mod admin;
pub mod common;
pub mod config;
pub mod controller;
pub mod error;
pub mod guard;
pub mod routing;
pub mod security;
pub mod user;

// Re-export core types
pub use controller::Controller;
pub use error::{Result, RoutewardError};
pub use routing::{ControllerRegistry, HttpMethod, RouteDescriptor, RouteLoader};
pub use security::Identity;

// Re-export macros
pub use routeward_macro::{
    body, controller, delete, form, get, param, patch, post, put, query, route, routes,
};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use routeward::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::found;
    pub use crate::config::ConfigService;
    pub use crate::controller::Controller;
    pub use crate::error::{Result, RoutewardError};
    pub use crate::guard::{Guard, GuardError, GuardLayer, GuardResult, RoleGuard};
    pub use crate::routing::{ControllerRegistry, HttpMethod, RouteDescriptor, RouteLoader};
    pub use crate::security::{Identity, load_identity};
    pub use crate::user::{SeaOrmUserRepository, User, UserRepository};
    pub use crate::{
        body, controller, delete, form, get, param, patch, post, put, query, route, routes,
    };
    pub use async_trait::async_trait;
    pub use axum::{
        Form, Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{Html, IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
