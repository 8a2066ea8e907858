//! Registration and login.
//!
//! Credentials are checked against stored hashes only; no sessions or tokens
//! are issued. A successful login simply returns the user record.

use windveal_types::error::{AuthError, RepositoryError};
use windveal_types::user::{LoginRequest, NewUser, RegisterRequest, User};

use crate::repository::user::UserRepository;
use crate::service::hash::CredentialHasher;

/// Service for account creation and credential checks.
pub struct AuthService<U: UserRepository, H: CredentialHasher> {
    users: U,
    hasher: H,
}

impl<U: UserRepository, H: CredentialHasher> AuthService<U, H> {
    pub fn new(users: U, hasher: H) -> Self {
        Self { users, hasher }
    }

    /// Create an account.
    ///
    /// Username and email are trimmed; the password is used as given. Fails
    /// with [`AuthError::AlreadyExists`] if either the username or the email
    /// is taken.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let username = request.username.trim();
        let email = request.email.trim();
        if username.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if self.users.exists(username, email).await? {
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        };

        // A concurrent registration can still win the race past `exists`.
        match self.users.create(&new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "User registered");
                Ok(user)
            }
            Err(RepositoryError::Conflict(_)) => Err(AuthError::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Check a username/password pair.
    ///
    /// An unknown username and a wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<User, AuthError> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(credentials) = self.users.find_credentials(username).await? else {
            tracing::debug!(username, "Login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(&request.password, &credentials.password_hash)?
        {
            tracing::debug!(username, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(credentials.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use windveal_types::user::UserCredentials;

    #[derive(Default)]
    struct InMemoryUsers {
        rows: Mutex<Vec<UserCredentials>>,
    }

    impl UserRepository for InMemoryUsers {
        async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let created = User {
                id: rows.len() as i64 + 1,
                username: user.username.clone(),
                email: user.email.clone(),
                created_at: Utc::now(),
            };
            rows.push(UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            });
            Ok(created)
        }

        async fn exists(&self, username: &str, email: &str) -> Result<bool, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .any(|r| r.user.username == username || r.user.email == email))
        }

        async fn find_credentials(
            &self,
            username: &str,
        ) -> Result<Option<UserCredentials>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.user.username == username).cloned())
        }
    }

    /// Reversible stand-in so tests can check what was stored.
    struct PrefixHasher;

    impl CredentialHasher for PrefixHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
            Ok(stored_hash == format!("hashed:{password}"))
        }
    }

    fn service() -> AuthService<InMemoryUsers, PrefixHasher> {
        AuthService::new(InMemoryUsers::default(), PrefixHasher)
    }

    fn register_req(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_req(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        let user = svc
            .register(register_req("ana", "ana@example.com", "s3cret"))
            .await
            .unwrap();
        assert_eq!(user.username, "ana");

        let logged_in = svc.login(login_req("ana", "s3cret")).await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let svc = service();
        svc.register(register_req("ana", "ana@example.com", "s3cret"))
            .await
            .unwrap();
        let rows = svc.users.rows.lock().unwrap();
        assert_eq!(rows[0].password_hash, "hashed:s3cret");
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let svc = service();
        let err = svc
            .register(register_req("ana", "  ", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_or_email() {
        let svc = service();
        svc.register(register_req("ana", "ana@example.com", "pw"))
            .await
            .unwrap();

        let same_name = svc
            .register(register_req("ana", "other@example.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(same_name, AuthError::AlreadyExists));

        let same_email = svc
            .register(register_req("bob", "ana@example.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(same_email, AuthError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_login_missing_credentials() {
        let err = service().login(login_req("", "pw")).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_look_alike() {
        let svc = service();
        svc.register(register_req("ana", "ana@example.com", "right"))
            .await
            .unwrap();

        let wrong = svc.login(login_req("ana", "wrong")).await.unwrap_err();
        let unknown = svc.login(login_req("nobody", "right")).await.unwrap_err();
        assert_eq!(wrong.to_string(), "Invalid credentials");
        assert_eq!(unknown.to_string(), wrong.to_string());
    }
}
