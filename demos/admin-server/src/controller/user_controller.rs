use super::escape;
use axum::extract::rejection::FormRejection;
use routeward::prelude::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub identifier: String,
    /// Comma separated role names.
    #[serde(default)]
    pub roles: String,
}

/// User management. Mounted behind `RoleGuard("ROLE_ADMIN")`.
#[controller(path = "/user")]
pub struct UserController {
    users: Arc<dyn UserRepository>,
}

impl UserController {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[routes]
impl UserController {
    #[get("/", name = "user_index")]
    async fn index(&self) -> Result<Html<String>> {
        let users = self.users.find_all().await?;

        let mut page = String::from(
            "<h1>Users</h1><table><tr><th>ID</th><th>Identifier</th><th>Roles</th><th></th></tr>",
        );
        for user in &users {
            page.push_str(&format!(
                "<tr><td>{id}</td><td>{identifier}</td><td>{roles}</td>\
                 <td><a href=\"/user/{id}\">edit</a></td></tr>",
                id = user.id,
                identifier = escape(&user.identifier),
                roles = escape(&user.roles.join(", ")),
            ));
        }
        page.push_str("</table>");
        Ok(Html(page))
    }

    #[get("/{id}", name = "user_edit")]
    async fn edit(&self, #[param] id: i32) -> Result<Response> {
        let Some(user) = self.users.find_by_id(id).await? else {
            return Ok(not_found());
        };

        Ok(Html(format!(
            "<h1>Edit user {id}</h1>\
             <form method=\"post\" action=\"/user/{id}\">\
             <input name=\"identifier\" value=\"{identifier}\">\
             <input name=\"roles\" value=\"{roles}\">\
             <button type=\"submit\">Save</button></form>\
             <form method=\"post\" action=\"/user/{id}/delete\">\
             <button type=\"submit\">Delete</button></form>",
            id = user.id,
            identifier = escape(&user.identifier),
            roles = escape(&user.roles.join(",")),
        ))
        .into_response())
    }

    #[post("/{id}", name = "user_update")]
    async fn update(
        &self,
        #[param] id: i32,
        form: std::result::Result<Form<UserForm>, FormRejection>,
    ) -> Result<Response> {
        let Ok(Form(form)) = form else {
            return Ok(found(format!("/user/{}", id)));
        };

        let roles: Vec<String> = form
            .roles
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect();

        match self.users.update(id, form.identifier.trim(), &roles).await? {
            Some(_) => Ok(found("/user")),
            None => Ok(not_found()),
        }
    }

    #[post("/{id}/delete", name = "user_delete")]
    async fn delete(&self, #[param] id: i32) -> Result<Response> {
        if self.users.delete(id).await? {
            Ok(found("/user"))
        } else {
            Ok(not_found())
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "User not found!").into_response()
}
