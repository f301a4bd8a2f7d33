use crate::admin::console::{Console, ConsoleError};
use crate::error::RoutewardError;
use crate::user::{User, UserRepository};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Menu entries, in display order. The first one is the default.
pub const MENU: [&str; 5] = [
    "Exit",
    "Create User",
    "Read Users",
    "Update User",
    "Delete User",
];

const MENU_QUESTION: &str = "Please select an option (defaults to exit)";
const DEFAULT_ROLE: &str = "ROLE_USER";
const NOT_AVAILABLE: &str = "n/a";

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error(transparent)]
    Repository(#[from] RoutewardError),

    #[error("User not found!")]
    UserNotFound,

    #[error("Unknown answer: {0}")]
    UnknownAnswer(String),
}

#[derive(Debug, PartialEq, Eq)]
enum MenuFlow {
    Continue,
    Exit,
}

/// Console command to create, list, update and delete user accounts.
pub struct UserAdminCommand {
    users: Arc<dyn UserRepository>,
    roles: Vec<String>,
}

impl UserAdminCommand {
    pub fn new(users: Arc<dyn UserRepository>, roles: Vec<String>) -> Self {
        Self { users, roles }
    }

    /// Run the menu loop until "Exit" is chosen or the input ends.
    ///
    /// # Errors
    /// Only output failures end the command early; action failures are
    /// reported on the console and the menu is shown again.
    pub async fn execute<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
    ) -> Result<(), AdminError> {
        io.title("User Admin")?;

        while self.show_menu(io).await? == MenuFlow::Continue {}

        Ok(())
    }

    async fn show_menu<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
    ) -> Result<MenuFlow, AdminError> {
        let menu: Vec<String> = MENU.iter().map(|entry| entry.to_string()).collect();
        let answer = io.choice(MENU_QUESTION, &menu, Some(MENU[0]))?;
        io.writeln(&answer)?;

        let result = match answer.as_str() {
            "Create User" => self.create_user(io).await.map(|_| Some("User created")),
            "Read Users" => self.render_users_table(io).await.map(|_| None),
            "Update User" => self.edit_user(io).await.map(|_| Some("User updated")),
            "Delete User" => self
                .delete_user(io)
                .await
                .map(|_| Some("User has been removed")),
            "Exit" => {
                io.text("have Fun =;)")?;
                return Ok(MenuFlow::Exit);
            }
            other => Err(AdminError::UnknownAnswer(other.to_string())),
        };

        match result {
            Ok(Some(message)) => io.success(message)?,
            Ok(None) => {}
            Err(AdminError::Console(ConsoleError::Io(e))) => return Err(ConsoleError::Io(e).into()),
            Err(e) => {
                tracing::warn!(error = %e, action = %answer, "user admin action failed");
                io.error(&e.to_string())?;
            }
        }

        Ok(MenuFlow::Continue)
    }

    async fn create_user<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
    ) -> Result<(), AdminError> {
        let identifier = self.ask_identifier(io, None)?;
        let role = self.ask_role(io, &[])?;

        self.users.create(&identifier, &[role]).await?;
        Ok(())
    }

    async fn render_users_table<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
    ) -> Result<(), AdminError> {
        let users = self.users.find_all().await?;

        io.text(&format!("There are {} users in the database.", users.len()))?;

        let rows: Vec<Vec<String>> = users.iter().map(user_row).collect();
        io.table(&["ID", "Identifier", "Roles", "GoogleId", "GitHubId"], &rows)?;
        Ok(())
    }

    async fn edit_user<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
    ) -> Result<(), AdminError> {
        let user = self.find_user(io).await?;

        let identifier = self.ask_identifier(io, Some(&user.identifier))?;
        let role = self.ask_role(io, &user.roles)?;

        self.users
            .update(user.id, &identifier, &[role])
            .await?
            .ok_or(AdminError::UserNotFound)?;
        Ok(())
    }

    async fn delete_user<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
    ) -> Result<(), AdminError> {
        let user = self.find_user(io).await?;

        if !self.users.delete(user.id).await? {
            return Err(AdminError::UserNotFound);
        }
        Ok(())
    }

    fn ask_identifier<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
        default: Option<&str>,
    ) -> Result<String, AdminError> {
        let question = match default {
            Some(default) => format!("Identifier ({}): ", default),
            None => "Identifier: ".to_string(),
        };

        loop {
            let identifier = io.ask(&question, default)?.ok_or(ConsoleError::Aborted)?;
            if !identifier.is_empty() {
                return Ok(identifier);
            }
            io.warning("Identifier required :(")?;
        }
    }

    fn ask_role<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
        current: &[String],
    ) -> Result<String, AdminError> {
        let offered = |role: &&str| self.roles.iter().any(|r| r == role);
        let default = current
            .first()
            .map(String::as_str)
            .filter(offered)
            .or_else(|| Some(DEFAULT_ROLE).filter(offered))
            .or_else(|| self.roles.first().map(String::as_str))
            .unwrap_or(DEFAULT_ROLE);
        let question = format!("User role ({})", default);

        Ok(io.choice(&question, &self.roles, Some(default))?)
    }

    async fn find_user<R: BufRead, W: Write>(
        &self,
        io: &mut Console<R, W>,
    ) -> Result<User, AdminError> {
        let answer = io.ask("User ID: ", None)?.ok_or(ConsoleError::Aborted)?;
        let id: i32 = answer.parse().map_err(|_| AdminError::UserNotFound)?;

        self.users
            .find_by_id(id)
            .await?
            .ok_or(AdminError::UserNotFound)
    }
}

fn user_row(user: &User) -> Vec<String> {
    vec![
        user.id.to_string(),
        user.identifier.clone(),
        user.roles.join(", "),
        user.google_id
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        user.github_id
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    ]
}
