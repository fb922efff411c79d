use thiserror::Error;
use super::InternalError;

#[derive(Error, Debug)]
pub enum MemberError {
    #[error("Member already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("Constraint violation on {field}: {reason}")]
    ConstraintViolation { field: &'static str, reason: String },

    #[error("Member ID not found: {member_id}")]
    MemberNotFound { member_id: i64 },

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Member '{username}' has not been saved yet")]
    NotPersisted { username: String },
}

impl MemberError {
    pub fn duplicate_username(username: impl Into<String>) -> InternalError {
        InternalError::Member(Self::DuplicateUsername { username: username.into() })
    }

    pub fn constraint_violation(field: &'static str, reason: impl Into<String>) -> InternalError {
        InternalError::Member(Self::ConstraintViolation { field, reason: reason.into() })
    }

    pub fn member_not_found(member_id: i64) -> InternalError {
        InternalError::Member(Self::MemberNotFound { member_id })
    }
}
