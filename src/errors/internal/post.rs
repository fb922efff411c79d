use thiserror::Error;
use super::InternalError;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Post ID not found: {post_id}")]
    PostNotFound { post_id: i64 },

    #[error("Constraint violation on {field}: {reason}")]
    ConstraintViolation { field: &'static str, reason: String },
}

impl PostError {
    pub fn post_not_found(post_id: i64) -> InternalError {
        InternalError::Post(Self::PostNotFound { post_id })
    }

    pub fn constraint_violation(field: &'static str, reason: impl Into<String>) -> InternalError {
        InternalError::Post(Self::ConstraintViolation { field, reason: reason.into() })
    }
}
