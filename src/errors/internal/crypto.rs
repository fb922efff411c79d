#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("password hashing failure in {component} during {operation}: {message}")]
    PasswordHash {
        operation: &'static str,
        component: &'static str,
        message: String,
    },
}

impl CryptoError {
    /// `argon2` and `password_hash` errors only guarantee `Display` here, so
    /// they are carried by message.
    pub fn password_hash(
        component: &'static str,
        operation: &'static str,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::PasswordHash {
            component,
            operation,
            message: err.to_string(),
        }
    }
}
