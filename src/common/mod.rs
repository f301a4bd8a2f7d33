use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// `302 Found` pointing at `location`.
///
/// axum's `Redirect` only offers 303/307/308; login redirects in admin
/// applications are expected to answer 302.
pub fn found(location: impl AsRef<str>) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.as_ref().to_string())],
    )
        .into_response()
}
