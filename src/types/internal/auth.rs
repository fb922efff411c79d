use std::fmt;

use serde::Serialize;

use crate::types::db::Role;
use crate::types::internal::member::Member;

/// Prefix the authentication layer expects on role authorities
pub const ROLE_PREFIX: &str = "ROLE_";

/// Credentials handed to the authentication layer for a looked-up member
///
/// Carries only what that layer needs: the login name, the stored hash and the
/// granted authorities. The hash is never serialized.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct UserCredentials {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub authorities: Vec<String>,
}

impl UserCredentials {
    pub fn authority_for(role: Role) -> String {
        format!("{}{}", ROLE_PREFIX, role.name())
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl From<&Member> for UserCredentials {
    fn from(member: &Member) -> Self {
        Self {
            username: member.username().to_owned(),
            password: member.password().to_owned(),
            authorities: vec![Self::authority_for(member.role())],
        }
    }
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("authorities", &self.authorities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::member::NewMember;

    fn member_with_role(role: Role) -> Member {
        Member::with_role(
            NewMember {
                username: "username".to_string(),
                password: "{argon2}$argon2id$hash".to_string(),
                name: "Member1".to_string(),
                nick_name: "NickName1".to_string(),
                age: 22,
            },
            role,
        )
    }

    #[test]
    fn test_credentials_carry_hash_and_single_role() {
        let credentials = UserCredentials::from(&member_with_role(Role::User));

        assert_eq!(credentials.username, "username");
        assert_eq!(credentials.password, "{argon2}$argon2id$hash");
        assert_eq!(credentials.authorities, vec!["ROLE_USER".to_string()]);
        assert!(credentials.has_authority("ROLE_USER"));
        assert!(!credentials.has_authority("ROLE_ADMIN"));
    }

    #[test]
    fn test_admin_role_maps_to_admin_authority() {
        let credentials = UserCredentials::from(&member_with_role(Role::Admin));
        assert_eq!(credentials.authorities, vec!["ROLE_ADMIN".to_string()]);
    }

    #[test]
    fn test_serialization_omits_password() {
        let credentials = UserCredentials::from(&member_with_role(Role::User));
        let json = serde_json::to_string(&credentials).unwrap();

        assert!(json.contains("\"username\":\"username\""));
        assert!(json.contains("ROLE_USER"));
        assert!(!json.contains("argon2"));
    }
}
