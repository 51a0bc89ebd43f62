use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{BaseRepository, PasswordService, TokenService, UserRepository};

const MAX_USERNAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;

/// Sign-up form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

/// Registration, login and profile management.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    pub async fn register(&self, form: Registration) -> Result<AuthSession, DomainError> {
        let mut errors = validate_identity(&form.username, &form.email);
        if form.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }
        DomainError::check(errors)?;
        self.ensure_username_free(&form.username, None).await?;

        let hash = self.passwords.hash(&form.password)?;
        let mut user = User::new(form.username, form.email, hash);
        user.first_name = form.first_name;
        user.last_name = form.last_name;

        let user = self.users.save(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        self.session(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, DomainError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            self.passwords.verify_unknown(password);
            tracing::debug!(%username, "login rejected");
            return Err(DomainError::Unauthorized);
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(%username, "login rejected");
            return Err(DomainError::Unauthorized);
        }

        self.session(user)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.current_user(user_id).await?;

        DomainError::check(validate_identity(&update.username, &update.email))?;
        if update.username != user.username {
            self.ensure_username_free(&update.username, Some(user.id))
                .await?;
        }

        user.username = update.username;
        user.email = update.email;
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.updated_at = Utc::now();
        Ok(self.users.save(user).await?)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current: &str,
        new: &str,
    ) -> Result<(), DomainError> {
        let mut user = self.current_user(user_id).await?;

        if !self.passwords.verify(current, &user.password_hash)? {
            return Err(DomainError::Validation(vec![
                "current password is incorrect".to_string(),
            ]));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(vec![format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )]));
        }

        user.password_hash = self.passwords.hash(new)?;
        user.updated_at = Utc::now();
        self.users.save(user).await?;
        tracing::info!(%user_id, "password changed");
        Ok(())
    }

    fn session(&self, user: User) -> Result<AuthSession, DomainError> {
        let access_token = self
            .tokens
            .generate_token(user.id, &user.username, user.roles())?;
        Ok(AuthSession {
            user,
            access_token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    async fn ensure_username_free(
        &self,
        username: &str,
        owner: Option<Uuid>,
    ) -> Result<(), DomainError> {
        match self.users.find_by_username(username).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(format!(
                "username '{username}' is taken"
            ))),
            _ => Ok(()),
        }
    }
}

fn validate_identity(username: &str, email: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_username(username) {
        errors.push(format!(
            "username must be 1 to {MAX_USERNAME_LEN} letters, digits or @.+-_"
        ));
    }
    if !email.is_empty() && !email.contains('@') {
        errors.push("invalid email address".to_string());
    }
    errors
}

fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (1..=MAX_USERNAME_LEN).contains(&len)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(is_valid_username("ada.lovelace+blog"));
        assert!(is_valid_username("автор_1"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"a".repeat(MAX_USERNAME_LEN + 1)));
    }

    #[test]
    fn blank_email_is_allowed() {
        assert!(validate_identity("reader", "").is_empty());
        assert_eq!(validate_identity("reader", "not-an-email").len(), 1);
    }
}
