//! Mirrors `cmd/cloud-cli/auth.go`'s `auth` command group.

use anyhow::Result;
use clap::Subcommand;
use thecloud_sdk::Client;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Generate a demo API key for `user_id` and save it locally.
    CreateDemo { user_id: Uuid, name: String },
    /// Save an existing API key to the local config.
    Login { key: String },
    /// List the roles recognized by the permission matrix.
    Roles,
    /// Inspect or change a user's role.
    #[command(subcommand)]
    Role(RoleCommand),
}

#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Print the caller's own role.
    Get,
    /// Set another user's role (requires `auth:update`).
    Set { user_id: Uuid, role: String },
}

pub async fn run(cmd: AuthCommand, client: Client, json: bool) -> Result<()> {
    match cmd {
        AuthCommand::CreateDemo { user_id, name } => {
            let key = client.create_key(user_id, &name).await?;
            config::save_api_key(&key.key)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&key)?);
            } else {
                println!("Generated key: {}", key.key);
                println!("Saved to ~/.thecloud/config.json");
            }
        }
        AuthCommand::Login { key } => {
            config::save_api_key(&key)?;
            println!("Key saved to configuration.");
        }
        AuthCommand::Roles => {
            let roles = client.list_roles().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roles)?);
            } else {
                for role in roles {
                    println!("{role}");
                }
            }
        }
        AuthCommand::Role(RoleCommand::Get) => {
            let role = client.my_role().await?;
            println!("{role}");
        }
        AuthCommand::Role(RoleCommand::Set { user_id, role }) => {
            let user = client.update_user_role(user_id, &role).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} is now {}", user.email, user.role);
            }
        }
    }
    Ok(())
}
