use thiserror::Error;

/// Errors from repository operations (used by trait definitions in windveal-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing fields")]
    MissingFields,

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("User already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from loading the persona file.
#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("persona file not found: {0}")]
    NotFound(String),

    #[error("failed to read persona file: {0}")]
    Io(String),

    #[error("invalid persona file: {0}")]
    Invalid(String),
}

/// Errors from loading `windveal.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid config file {path}: {message}")]
    Parse { path: String, message: String },
}
