pub mod default_controller;
pub mod security;
pub mod user_controller;

pub use default_controller::DefaultController;
pub use security::LoginController;
pub use user_controller::UserController;

/// Minimal HTML escaping for values rendered into pages.
pub(crate) fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
