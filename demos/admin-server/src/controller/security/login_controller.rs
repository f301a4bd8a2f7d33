use axum::extract::rejection::FormRejection;
use routeward::prelude::*;
use routeward::security::IDENTITY_KEY;
use serde::Deserialize;
use tower_sessions::Session;

const LOGIN_PAGE: &str = "<h1>Login</h1>\
    <form method=\"post\" action=\"/login\">\
    <input name=\"identifier\" placeholder=\"Identifier\">\
    <button type=\"submit\">Login</button>\
    </form>";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub identifier: String,
}

#[controller(path = "/")]
pub struct LoginController {
    users: Arc<dyn UserRepository>,
}

impl LoginController {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[routes]
impl LoginController {
    #[get("/login", name = "login")]
    async fn login(&self) -> Html<&'static str> {
        Html(LOGIN_PAGE)
    }

    /// Signs in by identifier alone, with no credential check.
    ///
    /// Demo-only stand-in for the Google and GitHub OAuth login flows; do not
    /// expose it in a real deployment.
    #[post("/login", name = "login_check")]
    async fn check(
        &self,
        session: Session,
        form: std::result::Result<Form<LoginForm>, FormRejection>,
    ) -> Result<Response> {
        let Ok(Form(form)) = form else {
            return Ok(found("/login"));
        };

        match self.users.find_by_identifier(form.identifier.trim()).await? {
            Some(user) => {
                session.insert(IDENTITY_KEY, Identity::from(&user)).await?;
                tracing::info!(user_id = user.id, "user logged in");
                Ok(found("/"))
            }
            None => {
                tracing::warn!(identifier = %form.identifier, "login rejected");
                Ok(found("/login"))
            }
        }
    }

    // Reachable with any method so plain links work.
    #[route("/logout", name = "logout")]
    async fn logout(&self, session: Session) -> Result<Response> {
        session.flush().await?;
        Ok(found("/"))
    }
}
