use thiserror::Error;

/// Errors raised while loading settings and secrets at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required secret '{secret_name}' is missing")]
    MissingSecret { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    SecretTooShort {
        secret_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid database URL format: {0}")]
    InvalidDatabaseUrl(String),
}
