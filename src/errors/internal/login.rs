use thiserror::Error;
use super::InternalError;

/// Errors reported to the authentication layer
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("No member is registered with username '{username}'")]
    PrincipalNotFound { username: String },

    /// Unknown username or wrong password; the two are not told apart
    #[error("Invalid username or password")]
    BadCredentials,

    #[error("No session is open for the given refresh token")]
    UnknownRefreshToken,
}

impl LoginError {
    pub fn principal_not_found(username: impl Into<String>) -> InternalError {
        InternalError::Login(Self::PrincipalNotFound { username: username.into() })
    }

    pub fn bad_credentials() -> InternalError {
        InternalError::Login(Self::BadCredentials)
    }
}
