// Controllers are declared through macros:
// - #[controller(path = "...")] on the struct provides base_path()
// - #[routes] on the impl block provides router() and the Controller impl
// - #[get], #[post], #[put], #[patch], #[delete], #[route] declare the routes
use crate::routing::RouteDescriptor;

/// A source unit that declares routes.
///
/// Implemented by `#[routes]`; the identifier is the module path of the impl
/// block, e.g. `admin_server::controller::security::login_controller`.
pub trait Controller: Send + Sync + 'static {
    fn identifier() -> &'static str;

    fn routes() -> Vec<RouteDescriptor>;
}
