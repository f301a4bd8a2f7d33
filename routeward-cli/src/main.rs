//! Routeward CLI
//!
//! Console commands for routeward applications: the interactive user admin
//! and schema setup.

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use routeward::admin::{Console, UserAdminCommand};
use routeward::config::ConfigService;
use routeward::user::{SeaOrmUserRepository, create_schema};
use sea_orm::{Database, DatabaseConnection};
use std::process;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("routeward")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Routeward administration commands")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("database-url")
                .long("database-url")
                .value_name("URL")
                .env("DATABASE_URL")
                .help("Database connection string")
                .global(true),
        )
        .subcommand(
            Command::new("user-admin")
                .visible_aliases(["useradmin", "admin"])
                .about("Create, read, update and delete users")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .value_name("ROLE")
                        .help("Role offered when creating or updating users (repeatable)")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(Command::new("schema").about("Create the user table if it does not exist"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigService::from_env();
    let matches = cli().get_matches();

    if let Err(e) = run(&config, &matches).await {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

async fn run(config: &ConfigService, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("user-admin", sub)) => user_admin(config, sub).await,
        Some(("schema", sub)) => schema(config, sub).await,
        Some((name, _)) => bail!("unknown command {name}"),
        None => bail!("no command given"),
    }
}

async fn user_admin(config: &ConfigService, matches: &ArgMatches) -> Result<()> {
    let db = connect(config, matches).await?;
    create_schema(&db)
        .await
        .context("failed to prepare the user table")?;

    let roles = roles(config, matches);
    tracing::debug!(?roles, "starting user admin");
    let command = UserAdminCommand::new(Arc::new(SeaOrmUserRepository::new(db)), roles);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    command.execute(&mut console).await?;
    Ok(())
}

async fn schema(config: &ConfigService, matches: &ArgMatches) -> Result<()> {
    let db = connect(config, matches).await?;
    create_schema(&db)
        .await
        .context("failed to create the user table")?;
    tracing::info!("user table ready");
    Ok(())
}

async fn connect(config: &ConfigService, matches: &ArgMatches) -> Result<DatabaseConnection> {
    let url = match matches.get_one::<String>("database-url") {
        Some(url) => url.clone(),
        None => config.database_url()?,
    };
    Database::connect(url.as_str())
        .await
        .with_context(|| format!("failed to connect to {url}"))
}

fn roles(config: &ConfigService, matches: &ArgMatches) -> Vec<String> {
    match matches.get_many::<String>("role") {
        Some(roles) => roles.cloned().collect(),
        None => config.user_roles(),
    }
}
