use clap::Subcommand;
use serde_json::json;
use sqlx::PgPool;

use crate::cli::utils::{output_error, output_success, output_users};
use crate::cli::OutputFormat;
use crate::services::{AccountOutcome, NewAccount, ServiceError, UserService};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an account (with --staff, promotes an existing one)")]
    Create {
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, help = "Initial password")]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, help = "Grant dashboard access")]
        staff: bool,
        #[arg(long, help = "Allow granting staff to others")]
        superuser: bool,
    },

    #[command(about = "Grant dashboard access to an existing account")]
    Promote {
        #[arg(help = "Email of the account")]
        email: String,
    },

    #[command(about = "List accounts, newest first")]
    List,
}

pub async fn handle(cmd: UserCommands, pool: &PgPool, output_format: &OutputFormat) -> anyhow::Result<()> {
    let service = UserService::new(pool.clone());

    match cmd {
        UserCommands::Create {
            email,
            password,
            first_name,
            last_name,
            staff,
            superuser,
        } => {
            let account = NewAccount {
                email,
                password,
                first_name,
                last_name,
                is_staff: staff,
                is_superuser: superuser,
            };
            match service.create_account(account).await {
                Ok(AccountOutcome::Created(user)) => output_success(
                    output_format,
                    &format!("Created user {} (id {})", user.email, user.id),
                    Some(json!({ "user": user })),
                ),
                Ok(AccountOutcome::Promoted(user)) => output_success(
                    output_format,
                    &format!("User {} already existed and is now staff", user.email),
                    Some(json!({ "user": user })),
                ),
                Err(ServiceError::Validation(errors)) => {
                    output_error(output_format, &errors.summary())?;
                    anyhow::bail!("user not created")
                }
                Err(e) => Err(e.into()),
            }
        }
        UserCommands::Promote { email } => {
            let user = service.promote_by_email(&email).await?;
            output_success(
                output_format,
                &format!("User {} is now an admin", user.email),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::List => {
            let users = service.list().await?;
            output_users(output_format, &users)
        }
    }
}
