use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::User;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": message
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// One line per account: id, email and role.
pub fn user_line(user: &User) -> String {
    let role = match (user.is_superuser, user.is_staff) {
        (true, true) => "superuser, staff",
        (true, false) => "superuser",
        (false, true) => "staff",
        (false, false) => "user",
    };
    let inactive = if user.is_active { "" } else { " (inactive)" };
    format!("{:>5}  {:<40} {}{}", user.id, user.email, role, inactive)
}

pub fn output_users(output_format: &OutputFormat, users: &[User]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
        }
        OutputFormat::Text if users.is_empty() => {
            println!("No users found");
        }
        OutputFormat::Text => {
            for user in users {
                println!("{}", user_line(user));
            }
        }
    }
    Ok(())
}
