//! Route descriptors and the loader seam the auditor resolves controllers through.

mod method;
mod registry;

pub use method::HttpMethod;
pub use registry::{ControllerRegistry, RouteLoader};

use serde::{Deserialize, Serialize};

/// Placeholder recognised by [`substitute_id`].
pub const ID_PLACEHOLDER: &str = "{id}";

/// A named route together with its full path template and declared methods.
///
/// An empty `methods` list means the route accepts any method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub name: String,
    pub path: String,
    pub methods: Vec<HttpMethod>,
}

impl RouteDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>, methods: Vec<HttpMethod>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            methods,
        }
    }
}

/// Join a controller base path and a handler path.
///
/// ```
/// use routeward::routing::join_path;
///
/// assert_eq!(join_path("/", "/login"), "/login");
/// assert_eq!(join_path("/user", "/"), "/user");
/// assert_eq!(join_path("/user/", "{id}"), "/user/{id}");
/// ```
pub fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    match (base.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", path),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, path),
    }
}

/// Replace every literal `{id}` token in `path` with `id`.
///
/// Other placeholders are left untouched.
pub fn substitute_id(path: &str, id: &str) -> String {
    path.replace(ID_PLACEHOLDER, id)
}
