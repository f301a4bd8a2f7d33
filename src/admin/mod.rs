//! Interactive user administration.
//!
//! ```rust,ignore
//! let users = Arc::new(SeaOrmUserRepository::new(db));
//! let command = UserAdminCommand::new(users, config.user_roles());
//!
//! let stdin = std::io::stdin();
//! let mut console = Console::new(stdin.lock(), std::io::stdout());
//! command.execute(&mut console).await?;
//! ```

mod command;
mod console;

pub use command::{AdminError, MENU, UserAdminCommand};
pub use console::{Console, ConsoleError, ConsoleResult};
