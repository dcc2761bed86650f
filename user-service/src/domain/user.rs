use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct RegisterInput {
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterInput {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let name = normalize_name(&self.name)?;
        let username = normalize_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        let password_len = self.password.chars().count();
        if password_len < 8 || password_len > 128 {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }
        Ok(Self {
            name,
            last_name: self.last_name.trim().to_string(),
            username,
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UpdateInput {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) email: String,
}

impl UpdateInput {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            id: self.id,
            name: normalize_name(&self.name)?,
            last_name: self.last_name.trim().to_string(),
            username: normalize_username(&self.username)?,
            email: normalize_email(&self.email)?,
        })
    }
}

fn normalize_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() || name.len() > 64 {
        return Err(DomainError::Validation {
            field: "name",
            message: "must be 1..64 chars",
        });
    }
    Ok(name.to_string())
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.len() < 3 || username.len() > 64 {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{RegisterInput, UpdateInput, normalize_email, normalize_username};

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "test@example.com");
    }

    #[test]
    fn username_rules_are_applied() {
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("valid_user").is_ok());
    }

    #[test]
    fn register_password_length_is_checked() {
        let short = RegisterInput {
            name: "Max".to_string(),
            last_name: "".to_string(),
            username: "valid_user".to_string(),
            email: "test@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = RegisterInput {
            name: "Max".to_string(),
            last_name: "  Doe ".to_string(),
            username: "valid_user".to_string(),
            email: "test@example.com".to_string(),
            password: "very-secure-password".to_string(),
        };
        let validated = ok.validate().expect("must be valid");
        assert_eq!(validated.last_name, "Doe");
        assert_eq!(validated.email, "test@example.com");
    }

    #[test]
    fn update_input_rejects_empty_name() {
        let input = UpdateInput {
            id: Uuid::new_v4(),
            name: "   ".to_string(),
            last_name: "".to_string(),
            username: "valid_user".to_string(),
            email: "test@example.com".to_string(),
        };
        assert!(input.validate().is_err());
    }
}
