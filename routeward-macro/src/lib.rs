use proc_macro::TokenStream;

mod controller;
mod http_methods;

/// Marks a struct as a controller mounted under `path`.
///
/// Provides `base_path()`, the prefix joined to every route path declared in
/// the controller's `#[routes]` block.
///
/// # Example
/// ```ignore
/// use routeward::controller;
///
/// #[controller(path = "/user")]
/// pub struct UserController {
///     users: Arc<dyn UserRepository>,
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Collects the route handlers of a controller's impl block.
///
/// Generates `router::<S>(Arc<Self>)` and the `routeward::Controller` impl
/// listing one route descriptor per handler.
///
/// # Example
/// ```ignore
/// #[routes]
/// impl UserController {
///     #[get("/{id}", name = "user_edit")]
///     async fn edit(&self, #[param] id: i32) -> Response {
///         // ...
///     }
///
///     #[route("/logout", name = "logout")]
///     async fn logout(&self) -> Response {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::routes_attribute(attr, item)
}

/// Declares a `GET` route: `#[get("/path", name = "route_name")]`
#[proc_macro_attribute]
pub fn get(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("GET", attr, item)
}

/// Declares a `POST` route: `#[post("/path", name = "route_name")]`
#[proc_macro_attribute]
pub fn post(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("POST", attr, item)
}

/// Declares a `PUT` route: `#[put("/path", name = "route_name")]`
#[proc_macro_attribute]
pub fn put(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("PUT", attr, item)
}

/// Declares a `DELETE` route: `#[delete("/path", name = "route_name")]`
#[proc_macro_attribute]
pub fn delete(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("DELETE", attr, item)
}

/// Declares a `PATCH` route: `#[patch("/path", name = "route_name")]`
#[proc_macro_attribute]
pub fn patch(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("PATCH", attr, item)
}

/// Route attribute with an explicit method list
///
/// `#[route("/path", methods = [GET, POST])]`; without `methods` the route
/// accepts any method.
#[proc_macro_attribute]
pub fn route(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("ROUTE", attr, item)
}

// Parameter markers. `#[routes]` reads and strips them; on their own they
// leave the item untouched.

/// Extract the parameter from a JSON body (`axum::Json`).
#[proc_macro_attribute]
pub fn body(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Extract the parameter from a url-encoded form body (`axum::Form`).
#[proc_macro_attribute]
pub fn form(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Extract the parameter from the path (`axum::extract::Path`).
#[proc_macro_attribute]
pub fn param(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Extract the parameter from the query string (`axum::extract::Query`).
#[proc_macro_attribute]
pub fn query(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}
