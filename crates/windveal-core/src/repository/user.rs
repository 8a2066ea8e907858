//! User repository trait definition.

use windveal_types::error::RepositoryError;
use windveal_types::user::{NewUser, User, UserCredentials};

/// Storage for registered users.
///
/// Usernames and emails are each unique. `create` reports a violation of
/// either as [`RepositoryError::Conflict`].
pub trait UserRepository: Send + Sync {
    /// Insert a user and return it with its assigned id.
    fn create(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// True if any user already has this username or this email.
    fn exists(
        &self,
        username: &str,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Look up a user and their password hash by username.
    fn find_credentials(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserCredentials>, RepositoryError>> + Send;
}
