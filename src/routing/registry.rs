use crate::controller::Controller;
use crate::error::{Result, RoutewardError};
use crate::routing::RouteDescriptor;
use std::collections::BTreeMap;

type RoutesFn = fn() -> Vec<RouteDescriptor>;

/// Resolves a controller identifier into the routes it declares.
pub trait RouteLoader {
    /// Load the routes of the controller registered under `identifier`.
    ///
    /// # Errors
    /// Returns [`RoutewardError::ControllerNotRegistered`] when nothing is
    /// registered under that identifier.
    fn load(&self, identifier: &str) -> Result<Vec<RouteDescriptor>>;

    /// Every identifier this loader can resolve.
    fn identifiers(&self) -> Vec<String>;
}

/// Explicit mapping from controller identifier to its route table.
///
/// Populated at startup with one [`register`](Self::register) call per
/// controller type.
///
/// # Example
/// ```rust,ignore
/// let mut registry = ControllerRegistry::new();
/// registry
///     .register::<DefaultController>()?
///     .register::<UserController>()?;
///
/// let routes = registry.load("admin_server::controller::user_controller")?;
/// ```
#[derive(Default, Clone)]
pub struct ControllerRegistry {
    controllers: BTreeMap<&'static str, RoutesFn>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: Controller>(&mut self) -> Result<&mut Self> {
        let identifier = C::identifier();
        if self.controllers.contains_key(identifier) {
            return Err(RoutewardError::DuplicateController {
                identifier: identifier.to_string(),
            });
        }
        tracing::debug!(controller = identifier, "registered controller");
        self.controllers.insert(identifier, C::routes);
        Ok(self)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.controllers.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl RouteLoader for ControllerRegistry {
    fn load(&self, identifier: &str) -> Result<Vec<RouteDescriptor>> {
        let routes = self.controllers.get(identifier).ok_or_else(|| {
            RoutewardError::ControllerNotRegistered {
                identifier: identifier.to_string(),
            }
        })?;
        Ok(routes())
    }

    fn identifiers(&self) -> Vec<String> {
        self.controllers.keys().map(|id| id.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::HttpMethod;

    struct LoginController;

    impl Controller for LoginController {
        fn identifier() -> &'static str {
            "app::controller::security::login_controller"
        }

        fn routes() -> Vec<RouteDescriptor> {
            vec![RouteDescriptor::new("login", "/login", vec![HttpMethod::Get])]
        }
    }

    #[test]
    fn test_register_and_load() {
        let mut registry = ControllerRegistry::new();
        registry.register::<LoginController>().unwrap();

        let routes = registry
            .load("app::controller::security::login_controller")
            .unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name, "login");
        assert_eq!(registry.identifiers(), vec![LoginController::identifier()]);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ControllerRegistry::new();
        registry.register::<LoginController>().unwrap();

        let result = registry.register::<LoginController>();
        assert!(matches!(
            result,
            Err(RoutewardError::DuplicateController { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_identifier_fails() {
        let registry = ControllerRegistry::new();
        let result = registry.load("app::controller::missing");
        assert!(matches!(
            result,
            Err(RoutewardError::ControllerNotRegistered { identifier }) if identifier == "app::controller::missing"
        ));
    }
}
