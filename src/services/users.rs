use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use super::{ServiceError, ValidationErrors, REQUIRED};
use crate::auth::{hash_password, verify_password, AuthError};
use crate::database::models::User;
use crate::database::{NewUser, UserRepository};

/// Body of `POST /admin/make-admin`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MakeAdminRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
}

impl MakeAdminRequest {
    /// Absent, null, blank and zero ids all count as missing.
    pub fn user_id(&self) -> Result<i64, ServiceError> {
        let missing = || ServiceError::InvalidInput("user_id is required".to_string());
        let id = match &self.user_id {
            None | Some(Value::Null) => return Err(missing()),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| ServiceError::InvalidInput("user_id must be an integer".to_string()))?,
            Some(Value::String(s)) if s.trim().is_empty() => return Err(missing()),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| ServiceError::InvalidInput("user_id must be an integer".to_string()))?,
            Some(_) => return Err(ServiceError::InvalidInput("user_id must be an integer".to_string())),
        };
        if id == 0 {
            return Err(missing());
        }
        Ok(id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MakeAdminResult {
    pub message: String,
    pub user: User,
}

/// Account fields accepted by the operator CLI.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewAccount {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.add("email", REQUIRED);
        } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            errors.add("email", "Enter a valid email address.");
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone)]
pub enum AccountOutcome {
    Created(User),
    Promoted(User),
}

pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list().await?)
    }

    /// Check credentials; every failure looks the same to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "Rejected login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(user)
    }

    /// Grant the staff flag to the user with `id`.
    pub async fn make_admin(&self, id: i64) -> Result<MakeAdminResult, ServiceError> {
        let user = self
            .users
            .set_staff(id, true)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        tracing::info!(user_id = user.id, "Granted staff access");
        Ok(MakeAdminResult {
            message: format!("User {} is now an admin", user.email),
            user,
        })
    }

    pub async fn promote_by_email(&self, email: &str) -> Result<User, ServiceError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", email.trim())))?;
        Ok(self.make_admin(user.id).await?.user)
    }

    /// Create an account, or promote the existing one when staff is requested.
    pub async fn create_account(&self, account: NewAccount) -> Result<AccountOutcome, ServiceError> {
        account.validate()?;
        let email = account.email.trim().to_string();

        if let Some(existing) = self.users.find_by_email(&email).await? {
            if account.is_staff {
                let user = self.make_admin(existing.id).await?.user;
                return Ok(AccountOutcome::Promoted(user));
            }
            return Err(ValidationErrors::single("email", "User with this email already exists.").into());
        }

        let user = self
            .users
            .insert(&NewUser {
                email,
                password_hash: hash_password(&account.password)?,
                first_name: account.first_name.trim().to_string(),
                last_name: account.last_name.trim().to_string(),
                is_staff: account.is_staff,
                is_superuser: account.is_superuser,
            })
            .await?;
        tracing::info!(user_id = user.id, "Created user");
        Ok(AccountOutcome::Created(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> MakeAdminRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_user_id_is_reported() {
        for body in [json!({}), json!({"user_id": null}), json!({"user_id": ""}), json!({"user_id": 0})] {
            let err = request(body.clone()).user_id().unwrap_err();
            assert!(
                matches!(&err, ServiceError::InvalidInput(m) if m == "user_id is required"),
                "{body}"
            );
        }
    }

    #[test]
    fn numeric_user_ids_parse() {
        assert_eq!(request(json!({"user_id": 7})).user_id().unwrap(), 7);
        assert_eq!(request(json!({"user_id": "12"})).user_id().unwrap(), 12);
        assert!(request(json!({"user_id": "seven"})).user_id().is_err());
        assert!(request(json!({"user_id": [1]})).user_id().is_err());
    }

    #[test]
    fn accounts_need_email_and_password() {
        let errors = NewAccount::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(REQUIRED));
        assert_eq!(errors.get("password"), Some(REQUIRED));

        let errors = NewAccount {
            email: "nobody".to_string(),
            password: "pw".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("email"), Some("Enter a valid email address."));
    }
}
