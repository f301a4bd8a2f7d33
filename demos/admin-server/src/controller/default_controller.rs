use routeward::prelude::*;

#[controller(path = "/")]
#[derive(Default)]
pub struct DefaultController;

#[routes]
impl DefaultController {
    #[get("/", name = "default")]
    async fn index(&self) -> Html<&'static str> {
        Html(
            "<h1>Admin</h1>\
             <ul><li><a href=\"/user\">Users</a></li><li><a href=\"/logout\">Logout</a></li></ul>",
        )
    }
}
