use std::collections::HashMap;
use std::sync::Mutex;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use rand::RngExt;
use tracing::info;

use crate::data::user_repository::{ListQuery, NewUser, UserPatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{RegisterInput, UpdateInput, User};

pub(crate) struct AccountService<R: UserRepository> {
    repo: R,
    // one pending verification code per email; consumed on successful match
    pending_codes: Mutex<HashMap<String, String>>,
}

impl<R: UserRepository> AccountService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R) -> Self {
        Self {
            repo,
            pending_codes: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn register(&self, input: RegisterInput) -> Result<User, DomainError> {
        let input = input.validate()?;

        if self.repo.check_uniques("email", &input.email).await? {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        if self.repo.check_uniques("username", &input.username).await? {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create(NewUser {
                name: input.name,
                last_name: input.last_name,
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        let code = generate_code();
        // email delivery is an external concern; the code is surfaced in the log
        info!(email = %user.email, code = %code, "verification code issued");
        self.lock_codes()?.insert(user.email.clone(), code);

        Ok(user)
    }

    pub(crate) async fn verify(&self, email: &str, code: &str) -> Result<User, DomainError> {
        if email.is_empty() || code.is_empty() {
            return Err(DomainError::Validation {
                field: "code",
                message: "email and code must be provided",
            });
        }

        {
            let mut codes = self.lock_codes()?;
            let matches = codes
                .get(email)
                .is_some_and(|expected| expected.as_str() == code);
            if !matches {
                return Err(DomainError::Validation {
                    field: "code",
                    message: "invalid or expired verification code",
                });
            }
            codes.remove(email);
        }

        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user email: {email}")))
    }

    pub(crate) async fn login(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        if email.is_empty() && username.is_empty() {
            return Err(DomainError::Validation {
                field: "email",
                message: "either email or username must be provided",
            });
        }
        if password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }

        let creds = match self.repo.find_credentials(email, username).await? {
            Some(creds) => creds,
            None => {
                // keep timing comparable when the user does not exist
                match verify_password(password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        verify_password(password, &creds.password_hash)?;
        Ok(creds.user)
    }

    pub(crate) async fn get(&self, field: &str, value: &str) -> Result<User, DomainError> {
        self.repo
            .get_by_field(field, value)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user {field}: {value}")))
    }

    pub(crate) async fn get_all(&self, query: ListQuery) -> Result<(Vec<User>, i64), DomainError> {
        self.repo.get_all(query).await
    }

    pub(crate) async fn update(&self, input: UpdateInput) -> Result<User, DomainError> {
        let input = input.validate()?;
        let id = input.id;
        self.repo
            .update(UserPatch {
                id: input.id,
                name: input.name,
                last_name: input.last_name,
                username: input.username,
                email: input.email,
            })
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {id}")))
    }

    pub(crate) async fn delete(&self, field: &str, value: &str) -> Result<bool, DomainError> {
        self.repo.soft_delete(field, value).await
    }

    pub(crate) async fn check_uniques(&self, field: &str, value: &str) -> Result<bool, DomainError> {
        self.repo.check_uniques(field, value).await
    }

    pub(crate) async fn get_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user email: {email}")))
    }

    fn lock_codes(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, DomainError> {
        self.pending_codes
            .lock()
            .map_err(|_| DomainError::Unexpected("verification store poisoned".to_string()))
    }

    #[cfg(test)]
    fn pending_code(&self, email: &str) -> Option<String> {
        self.pending_codes
            .lock()
            .expect("verification store mutex poisoned")
            .get(email)
            .cloned()
    }
}

fn generate_code() -> String {
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

fn hash_password(raw_password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(password_hash.to_string())
}

fn verify_password(raw_password: &str, password_hash: &str) -> Result<(), DomainError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    argon2()?
        .verify_password(raw_password.as_bytes(), &parsed_hash)
        .map_err(|err| match err {
            PasswordHashError::Password => DomainError::InvalidCredentials,
            _ => DomainError::Unexpected(err.to_string()),
        })?;

    Ok(())
}

fn argon2() -> Result<Argon2<'static>, DomainError> {
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::{AccountService, hash_password};
    use crate::data::user_repository::{
        ListQuery, NewUser, UserCredentials, UserPatch, UserRepository,
    };
    use crate::domain::error::DomainError;
    use crate::domain::user::{RegisterInput, User};

    #[derive(Clone, Default)]
    struct FakeUserRepo {
        created_input: Arc<Mutex<Option<NewUser>>>,
        credentials: Arc<Mutex<Option<UserCredentials>>>,
        credentials_calls: Arc<Mutex<usize>>,
        user_by_email: Arc<Mutex<Option<User>>>,
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create(&self, input: NewUser) -> Result<User, DomainError> {
            let user = sample_user(&input.username, &input.email);
            *self
                .created_input
                .lock()
                .expect("created input mutex poisoned") = Some(input);
            Ok(user)
        }

        async fn get_by_field(
            &self,
            _field: &str,
            _value: &str,
        ) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn get_all(&self, _query: ListQuery) -> Result<(Vec<User>, i64), DomainError> {
            Ok((Vec::new(), 0))
        }

        async fn update(&self, _patch: UserPatch) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn soft_delete(&self, _field: &str, _value: &str) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn check_uniques(&self, _field: &str, _value: &str) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn find_credentials(
            &self,
            _email: &str,
            _username: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            *self
                .credentials_calls
                .lock()
                .expect("credentials calls mutex poisoned") += 1;
            Ok(self
                .credentials
                .lock()
                .expect("credentials mutex poisoned")
                .clone())
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .user_by_email
                .lock()
                .expect("user by email mutex poisoned")
                .clone())
        }
    }

    fn sample_user(username: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            last_name: "User".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: "Test".to_string(),
            last_name: "User".to_string(),
            username: "valid_user".to_string(),
            email: "valid@example.com".to_string(),
            password: "very-secure-password".to_string(),
        }
    }

    #[tokio::test]
    async fn register_stores_a_hash_and_parks_a_code() {
        let repo = FakeUserRepo::default();
        let service = AccountService::new(repo.clone());

        let user = service
            .register(register_input())
            .await
            .expect("register must succeed");

        let created = repo
            .created_input
            .lock()
            .expect("created input mutex poisoned")
            .clone()
            .expect("create must be called");
        assert_ne!(created.password_hash, "very-secure-password");
        assert!(created.password_hash.starts_with("$argon2id$"));

        let code = service
            .pending_code(&user.email)
            .expect("code must be pending");
        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn verify_consumes_the_code_once() {
        let repo = FakeUserRepo::default();
        *repo
            .user_by_email
            .lock()
            .expect("user by email mutex poisoned") =
            Some(sample_user("valid_user", "valid@example.com"));
        let service = AccountService::new(repo);

        service
            .register(register_input())
            .await
            .expect("register must succeed");
        let code = service
            .pending_code("valid@example.com")
            .expect("code must be pending");

        let wrong = service.verify("valid@example.com", "000000").await;
        assert!(matches!(wrong, Err(DomainError::Validation { .. })));

        let user = service
            .verify("valid@example.com", &code)
            .await
            .expect("verify must succeed");
        assert_eq!(user.email, "valid@example.com");

        // the code is single-use
        let replay = service.verify("valid@example.com", &code).await;
        assert!(matches!(replay, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn login_requires_email_or_username_before_any_lookup() {
        let repo = FakeUserRepo::default();
        let service = AccountService::new(repo.clone());

        let err = service
            .login("", "", "some-password")
            .await
            .expect_err("login must fail");
        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(
            *repo
                .credentials_calls
                .lock()
                .expect("credentials calls mutex poisoned"),
            0
        );
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_wrong_password() {
        let repo = FakeUserRepo::default();
        let service = AccountService::new(repo.clone());

        let err = service
            .login("ghost@example.com", "", "some-password")
            .await
            .expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));

        let hash = hash_password("correct-password").expect("hash must be created");
        *repo.credentials.lock().expect("credentials mutex poisoned") = Some(UserCredentials {
            user: sample_user("valid_user", "valid@example.com"),
            password_hash: hash,
        });

        let err = service
            .login("valid@example.com", "", "wrong-password")
            .await
            .expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));

        let user = service
            .login("valid@example.com", "", "correct-password")
            .await
            .expect("login must succeed");
        assert_eq!(user.username, "valid_user");
    }
}
