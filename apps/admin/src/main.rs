use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use auth_cell::models::{AdminCreation, UserError};
use auth_cell::UserService;
use cli::{AdminCommand, Cli};
use shared_config::AppConfig;
use shared_database::connect;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let users = UserService::with_store(connect(&config));

    run(&users, cli.command).await
}

async fn run(users: &UserService, command: AdminCommand) -> anyhow::Result<ExitCode> {
    match command {
        AdminCommand::Create { username, password } => {
            match users.create_admin(&username, &password).await? {
                AdminCreation::Created(id) => info!("Admin '{}' created ({})", username, id),
                AdminCreation::AlreadyExists => info!("Admin '{}' already exists", username),
                AdminCreation::UsernameTaken => {
                    warn!("'{}' is a regular account; no admin was created", username)
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        AdminCommand::Delete { username } => match users.delete_admin(&username).await {
            Ok(true) => {
                info!("Admin '{}' deleted", username);
                Ok(ExitCode::SUCCESS)
            }
            Ok(false) => {
                warn!("No admin named '{}' was found", username);
                Ok(ExitCode::SUCCESS)
            }
            Err(UserError::LastAdmin) => {
                error!("Cannot delete '{}': at least one admin must remain", username);
                Ok(ExitCode::FAILURE)
            }
            Err(e) => Err(e.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use shared_database::InMemoryStore;

    fn create(username: &str) -> AdminCommand {
        AdminCommand::Create {
            username: username.to_string(),
            password: "s3nha-forte".to_string(),
        }
    }

    fn delete(username: &str) -> AdminCommand {
        AdminCommand::Delete {
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn create_is_idempotent() {
        let users = UserService::with_store(Arc::new(InMemoryStore::new()));

        assert_eq!(run(&users, create("root")).await.unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(&users, create("root")).await.unwrap(), ExitCode::SUCCESS);
        assert!(users.find_by_username("root").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_over_regular_account_promotes_nobody() {
        let users = UserService::with_store(Arc::new(InMemoryStore::new()));
        users.register(Some("recepcao"), Some("pw")).await.unwrap();

        assert_eq!(run(&users, create("recepcao")).await.unwrap(), ExitCode::SUCCESS);
        let account = users.find_by_username("recepcao").await.unwrap().unwrap();
        assert_eq!(account.role.as_str(), "user");
    }

    #[tokio::test]
    async fn last_admin_cannot_be_deleted() {
        let users = UserService::with_store(Arc::new(InMemoryStore::new()));
        run(&users, create("root")).await.unwrap();

        assert_eq!(run(&users, delete("root")).await.unwrap(), ExitCode::FAILURE);

        run(&users, create("backup")).await.unwrap();
        assert_eq!(run(&users, delete("root")).await.unwrap(), ExitCode::SUCCESS);
        assert!(users.find_by_username("root").await.unwrap().is_none());
    }
}
