use thiserror::Error;

pub mod crypto;
pub mod database;
pub mod login;
pub mod member;
pub mod post;

pub use crypto::CryptoError;
pub use database::DatabaseError;
pub use login::LoginError;
pub use member::MemberError;
pub use post::PostError;

/// Internal error type for store and service operations
///
/// Infrastructure errors (config, database, crypto) are shared by every store; domain
/// errors (member, post, login) belong to the membership workflows. Callers at the
/// outer boundary decide how each one is reported.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Member(#[from] MemberError),

    #[error(transparent)]
    Post(#[from] PostError),

    #[error(transparent)]
    Login(#[from] LoginError),
}

impl InternalError {
    pub fn database(operation: &'static str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation { operation, source })
    }
}
