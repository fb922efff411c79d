use std::fmt;

use crate::errors::InternalError;
use crate::services::PasswordEncoder;
use crate::types::db::{comment, member, post, Role};

/// Fields required to register a member
///
/// `password` is the raw credential; it is hashed by
/// [`Member::encode_password`] before the member is saved.
#[derive(Clone)]
pub struct NewMember {
    pub username: String,
    pub password: String,
    pub name: String,
    pub nick_name: String,
    pub age: i32,
}

/// Member aggregate root
///
/// Owns the ids of the posts and comments the member wrote. Fields are private;
/// every change goes through one of the named operations below, and storage
/// constraints (uniqueness, blank values, lengths) are enforced by the member
/// store when the aggregate is saved.
#[derive(Clone, PartialEq)]
pub struct Member {
    id: Option<i64>,
    username: String,
    password: String,
    name: String,
    nick_name: String,
    age: i32,
    role: Role,
    refresh_token: Option<String>,
    post_list: Vec<i64>,
    comment_list: Vec<i64>,
    created_at: Option<i64>,
    updated_at: Option<i64>,
}

impl Member {
    /// Build a transient member with the USER role. The id is assigned on first save.
    pub fn new(new_member: NewMember) -> Self {
        Self::with_role(new_member, Role::User)
    }

    /// Build a transient member with an explicit role, for trusted provisioning only
    pub fn with_role(new_member: NewMember, role: Role) -> Self {
        let NewMember { username, password, name, nick_name, age } = new_member;
        Self {
            id: None,
            username,
            password,
            name,
            nick_name,
            age,
            role,
            refresh_token: None,
            post_list: Vec::new(),
            comment_list: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub(crate) fn hydrate(model: member::Model, post_list: Vec<i64>, comment_list: Vec<i64>) -> Self {
        Self {
            id: Some(model.id),
            username: model.username,
            password: model.password,
            name: model.name,
            nick_name: model.nick_name,
            age: model.age,
            role: model.role,
            refresh_token: model.refresh_token,
            post_list,
            comment_list,
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Stored credential; a hash once `encode_password` or `update_password` has run
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nick_name(&self) -> &str {
        &self.nick_name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn post_list(&self) -> &[i64] {
        &self.post_list
    }

    pub fn comment_list(&self) -> &[i64] {
        &self.comment_list
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    // == Associations ==

    /// Record `post` as owned by this member.
    ///
    /// The post's `writer_id` is not touched here: the post side records its
    /// writer, and callers must set both sides together (see `PostStore::write_post`).
    pub fn add_post(&mut self, post: &post::Model) {
        self.post_list.push(post.id);
    }

    /// Record `comment` as owned by this member. Same two-sided contract as [`Member::add_post`].
    pub fn add_comment(&mut self, comment: &comment::Model) {
        self.comment_list.push(comment.id);
    }

    // == Profile updates ==

    pub fn update_password(
        &mut self,
        encoder: &(impl PasswordEncoder + ?Sized),
        raw_password: &str,
    ) -> Result<(), InternalError> {
        self.password = encoder.encode(raw_password)?;
        Ok(())
    }

    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn update_nick_name(&mut self, nick_name: impl Into<String>) {
        self.nick_name = nick_name.into();
    }

    pub fn update_age(&mut self, age: i32) {
        self.age = age;
    }

    pub fn update_refresh_token(&mut self, refresh_token: impl Into<String>) {
        self.refresh_token = Some(refresh_token.into());
    }

    pub fn destroy_refresh_token(&mut self) {
        self.refresh_token = None;
    }

    // == Credentials ==

    /// Hash the current password in place. Used once, at registration.
    pub fn encode_password(
        &mut self,
        encoder: &(impl PasswordEncoder + ?Sized),
    ) -> Result<(), InternalError> {
        self.password = encoder.encode(&self.password)?;
        Ok(())
    }

    /// Check a raw candidate against the stored hash. Used before password
    /// changes and withdrawal.
    pub fn match_password(&self, encoder: &(impl PasswordEncoder + ?Sized), candidate: &str) -> bool {
        encoder.matches(candidate, &self.password)
    }

    /// Grant the USER role at registration. There is no ADMIN counterpart.
    pub fn add_user_authority(&mut self) {
        self.role = Role::User;
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("nick_name", &self.nick_name)
            .field("age", &self.age)
            .field("role", &self.role)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("post_list", &self.post_list)
            .field("comment_list", &self.comment_list)
            .finish()
    }
}

impl fmt::Debug for NewMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewMember")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("nick_name", &self.nick_name)
            .field("age", &self.age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DelegatingPasswordEncoder;

    fn new_member() -> Member {
        Member::new(NewMember {
            username: "username".to_string(),
            password: "1234567890".to_string(),
            name: "Member1".to_string(),
            nick_name: "NickName1".to_string(),
            age: 22,
        })
    }

    fn encoder() -> DelegatingPasswordEncoder {
        DelegatingPasswordEncoder::with_pepper("test-pepper-for-unit-tests")
    }

    fn post_model(id: i64, writer_id: i64) -> post::Model {
        post::Model {
            id,
            writer_id,
            title: "title".to_string(),
            content: "content".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_new_member_is_transient_user() {
        let member = new_member();

        assert_eq!(member.id(), None);
        assert_eq!(member.role(), Role::User);
        assert_eq!(member.refresh_token(), None);
        assert!(member.post_list().is_empty());
        assert!(member.comment_list().is_empty());
    }

    #[test]
    fn test_encode_password_hashes_in_place() {
        let encoder = encoder();
        let mut member = new_member();

        member.encode_password(&encoder).unwrap();

        assert_ne!(member.password(), "1234567890");
        assert!(member.password().starts_with("{argon2}"));
        assert!(member.match_password(&encoder, "1234567890"));
    }

    #[test]
    fn test_update_password_replaces_credential() {
        let encoder = encoder();
        let mut member = new_member();
        member.encode_password(&encoder).unwrap();

        member.update_password(&encoder, "new").unwrap();

        assert!(member.match_password(&encoder, "new"));
        assert!(!member.match_password(&encoder, "1234567890"));
    }

    #[test]
    fn test_profile_updates() {
        let mut member = new_member();

        member.update_name("updateName");
        member.update_nick_name("updateNickName");
        member.update_age(33);

        assert_eq!(member.name(), "updateName");
        assert_eq!(member.nick_name(), "updateNickName");
        assert_eq!(member.age(), 33);
    }

    #[test]
    fn test_refresh_token_lifecycle() {
        let mut member = new_member();

        member.update_refresh_token("refresh-token-value");
        assert_eq!(member.refresh_token(), Some("refresh-token-value"));

        member.destroy_refresh_token();
        assert_eq!(member.refresh_token(), None);
    }

    #[test]
    fn test_add_user_authority_demotes_to_user() {
        let mut member = Member::with_role(
            NewMember {
                username: "admin".to_string(),
                password: "pw".to_string(),
                name: "Admin".to_string(),
                nick_name: "Admin".to_string(),
                age: 40,
            },
            Role::Admin,
        );
        assert_eq!(member.role(), Role::Admin);

        member.add_user_authority();

        assert_eq!(member.role(), Role::User);
    }

    #[test]
    fn test_add_post_does_not_set_writer() {
        let mut member = new_member();
        let post = post_model(5, 99);

        member.add_post(&post);

        assert_eq!(member.post_list(), &[5]);
        assert_eq!(post.writer_id, 99);
    }

    #[test]
    fn test_add_comment_appends_in_order() {
        let mut member = new_member();
        for id in [3, 1, 2] {
            member.add_comment(&comment::Model {
                id,
                writer_id: 1,
                post_id: 1,
                content: "c".to_string(),
                created_at: 0,
                updated_at: 0,
            });
        }

        assert_eq!(member.comment_list(), &[3, 1, 2]);
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let mut member = new_member();
        member.update_refresh_token("secret-refresh-token");

        let debug = format!("{:?}", member);

        assert!(!debug.contains("1234567890"));
        assert!(!debug.contains("secret-refresh-token"));
        assert!(debug.contains("username"));
    }
}
