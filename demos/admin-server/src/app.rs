use crate::controller::{DefaultController, LoginController, UserController};
use axum::{Router, middleware};
use routeward::guard::{Guard, GuardLayer, RoleGuard};
use routeward::security::load_identity;
use routeward::user::UserRepository;
use routeward::{ControllerRegistry, Result};
use std::sync::Arc;
use tower_sessions::{MemoryStore, SessionManagerLayer};

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const LOGIN_PATH: &str = "/login";

/// Every controller of the application, keyed by module path.
pub fn registry() -> Result<ControllerRegistry> {
    let mut registry = ControllerRegistry::new();
    registry
        .register::<DefaultController>()?
        .register::<LoginController>()?
        .register::<UserController>()?;
    Ok(registry)
}

pub fn build_router(users: Arc<dyn UserRepository>) -> Router {
    let admin_only = GuardLayer::new(
        vec![Arc::new(RoleGuard::new(ROLE_ADMIN)) as Arc<dyn Guard>],
        LOGIN_PATH,
    );

    let home: Router = DefaultController::router(Arc::new(DefaultController));
    let security: Router = LoginController::router(Arc::new(LoginController::new(users.clone())));
    let user: Router = UserController::router(Arc::new(UserController::new(users)));

    Router::new()
        .merge(home)
        .merge(security)
        .merge(user.route_layer(admin_only))
        .layer(middleware::from_fn(load_identity))
        .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
}
