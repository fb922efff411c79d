#[cfg(test)]
mod tests {
    use crate::errors::internal::{
        CryptoError, DatabaseError, InternalError, LoginError, MemberError,
    };
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("save_member", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("save_member"));
        assert!(error_string.contains("Database error"));
    }

    #[test]
    fn test_transaction_errors_display_source() {
        let begin = DatabaseError::TransactionBegin {
            source: DbErr::Custom("pool closed".to_string()),
        };
        assert!(begin.to_string().starts_with("Starting transaction failed"));
        assert!(begin.to_string().contains("pool closed"));

        let commit = DatabaseError::TransactionCommit {
            source: DbErr::Custom("disk full".to_string()),
        };
        assert!(commit.to_string().contains("disk full"));
    }

    #[test]
    fn test_crypto_error_includes_component_and_operation() {
        let error = CryptoError::password_hash("argon2", "encode", "salt too short");

        let error_string = error.to_string();
        assert!(error_string.contains("argon2"));
        assert!(error_string.contains("encode"));
        assert!(error_string.contains("salt too short"));
    }

    #[test]
    fn test_principal_not_found_is_human_readable() {
        let error = LoginError::principal_not_found("ghost");
        assert_eq!(
            error.to_string(),
            "No member is registered with username 'ghost'"
        );
        assert!(matches!(
            error,
            InternalError::Login(LoginError::PrincipalNotFound { ref username }) if username == "ghost"
        ));
    }

    #[test]
    fn test_member_error_messages() {
        assert_eq!(
            MemberError::duplicate_username("username").to_string(),
            "Member already exists: username"
        );
        assert_eq!(
            MemberError::constraint_violation("name", "must not be blank").to_string(),
            "Constraint violation on name: must not be blank"
        );
        assert_eq!(
            MemberError::member_not_found(7).to_string(),
            "Member ID not found: 7"
        );
    }

    #[test]
    fn test_member_error_auto_converts_to_internal_error() {
        let internal_error: InternalError = MemberError::IncorrectPassword.into();
        assert!(matches!(
            internal_error,
            InternalError::Member(MemberError::IncorrectPassword)
        ));
    }
}
