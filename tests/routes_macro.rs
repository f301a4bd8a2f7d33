use axum::body::{Body, to_bytes};
use axum::http::{Method, Request};
use routeward::prelude::*;
use serde::Deserialize;
use tower::ServiceExt;

#[derive(Debug, Deserialize)]
struct Search {
    term: String,
}

#[derive(Debug, Deserialize)]
struct Rename {
    name: String,
}

#[controller(path = "/article")]
struct ArticleController {
    greeting: String,
}

#[routes]
impl ArticleController {
    #[get("/", name = "article_index")]
    async fn index(&self) -> String {
        self.greeting.clone()
    }

    #[get("/{id}")]
    async fn show(&self, #[param] id: i32) -> String {
        format!("article {}", id)
    }

    #[post("/{id}", name = "article_rename")]
    async fn rename(&self, #[param] id: i32, #[body] rename: Rename) -> String {
        format!("{} renamed to {}", id, rename.name)
    }

    #[get("/search", name = "article_search")]
    async fn search(&self, #[query] search: Search) -> String {
        format!("searching {}", search.term)
    }

    #[route("/feed", name = "article_feed")]
    async fn feed(&self) -> StatusCode {
        StatusCode::NO_CONTENT
    }

    #[route("/{id}/publish", name = "article_publish", methods = [PUT, PATCH])]
    async fn publish(&self, #[param] id: i32) -> Result<Response> {
        if id > 0 {
            Ok(found(format!("/article/{}", id)))
        } else {
            Err(RoutewardError::Internal("invalid id".to_string()))
        }
    }

    fn helper(&self) -> usize {
        self.greeting.len()
    }
}

fn app() -> Router {
    ArticleController::router(Arc::new(ArticleController {
        greeting: "articles".to_string(),
    }))
}

async fn call(method: Method, uri: &str, body: Body, json: bool) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    if json {
        request = request.header("content-type", "application/json");
    }
    let response = app().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[test]
fn test_routes_describe_every_handler() {
    let routes = ArticleController::routes();
    let described: Vec<(&str, &str, &[HttpMethod])> = routes
        .iter()
        .map(|r| (r.name.as_str(), r.path.as_str(), r.methods.as_slice()))
        .collect();

    assert_eq!(
        described,
        vec![
            ("article_index", "/article", &[HttpMethod::Get][..]),
            ("show", "/article/{id}", &[HttpMethod::Get][..]),
            ("article_rename", "/article/{id}", &[HttpMethod::Post][..]),
            ("article_search", "/article/search", &[HttpMethod::Get][..]),
            ("article_feed", "/article/feed", &[][..]),
            (
                "article_publish",
                "/article/{id}/publish",
                &[HttpMethod::Put, HttpMethod::Patch][..]
            ),
        ]
    );
}

#[test]
fn test_identifier_is_module_path() {
    assert_eq!(ArticleController::identifier(), module_path!());
    assert_eq!(ArticleController::base_path(), "/article");
}

#[test]
fn test_registry_resolves_generated_routes() {
    let mut registry = ControllerRegistry::new();
    registry.register::<ArticleController>().unwrap();

    let routes = registry.load(module_path!()).unwrap();
    assert_eq!(routes.len(), 6);
}

#[test]
fn test_plain_methods_are_kept() {
    let controller = ArticleController {
        greeting: "abc".to_string(),
    };
    assert_eq!(controller.helper(), 3);
}

#[tokio::test]
async fn test_router_dispatches_by_method() {
    assert_eq!(
        call(Method::GET, "/article", Body::empty(), false).await,
        (StatusCode::OK, "articles".to_string())
    );
    assert_eq!(
        call(Method::GET, "/article/7", Body::empty(), false).await,
        (StatusCode::OK, "article 7".to_string())
    );
    assert_eq!(
        call(
            Method::POST,
            "/article/7",
            Body::from(r#"{"name":"news"}"#),
            true
        )
        .await,
        (StatusCode::OK, "7 renamed to news".to_string())
    );
    assert_eq!(
        call(Method::GET, "/article/search?term=rust", Body::empty(), false).await,
        (StatusCode::OK, "searching rust".to_string())
    );
    assert_eq!(
        call(Method::DELETE, "/article/7", Body::empty(), false)
            .await
            .0,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[tokio::test]
async fn test_route_without_methods_accepts_any() {
    for method in [Method::GET, Method::POST, Method::DELETE] {
        let (status, _) = call(method, "/article/feed", Body::empty(), false).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn test_route_with_method_list() {
    let (status, _) = call(Method::PUT, "/article/3/publish", Body::empty(), false).await;
    assert_eq!(status, StatusCode::FOUND);
    let (status, _) = call(Method::PATCH, "/article/0/publish", Body::empty(), false).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = call(Method::GET, "/article/3/publish", Body::empty(), false).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
