use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::internal::{LoginError, MemberError};
use crate::errors::InternalError;
use crate::services::PasswordEncoder;
use crate::stores::MemberStore;
use crate::types::internal::{Member, NewMember};

/// Optional profile changes; `None` leaves the field as it is
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub nick_name: Option<String>,
    pub age: Option<i32>,
}

/// Membership workflows built on the member aggregate
///
/// Registration, profile and password changes, withdrawal, and the refresh
/// token side of login/logout. Issuing tokens is left to the caller: `login`
/// only records the token it is handed.
pub struct MemberService {
    db: DatabaseConnection,
    member_store: Arc<MemberStore>,
    password_encoder: Arc<dyn PasswordEncoder>,
}

impl MemberService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            member_store: Arc::clone(&app_data.member_store),
            password_encoder: Arc::clone(&app_data.password_encoder),
        }
    }

    /// Register a member: USER authority, encoded password, then save
    ///
    /// # Returns
    /// * `Ok(Member)` - The saved member
    /// * `Err(InternalError::Member(DuplicateUsername))` - Username already registered
    /// * `Err(InternalError::Member(ConstraintViolation))` - Blank or over-long profile field
    /// * `Err(InternalError::Crypto(..))` - Hashing failed
    pub async fn sign_up(&self, new_member: NewMember) -> Result<Member, InternalError> {
        if self
            .member_store
            .exists_by_username(&self.db, &new_member.username)
            .await?
        {
            return Err(MemberError::duplicate_username(new_member.username));
        }

        let mut member = Member::new(new_member);
        member.add_user_authority();
        member.encode_password(self.password_encoder.as_ref())?;

        let member = self.member_store.save(&self.db, member).await?;
        tracing::info!(member_id = ?member.id(), username = member.username(), "Member signed up");

        Ok(member)
    }

    /// Apply the profile fields set in `update` and save
    ///
    /// # Arguments
    /// * `member_id` - Member to change
    /// * `update` - New name, nick name and/or age
    ///
    /// # Returns
    /// * `Ok(Member)` - The saved member
    /// * `Err(InternalError::Member(MemberNotFound))` - No member has this id
    /// * `Err(InternalError::Member(ConstraintViolation))` - A new value is blank or too long
    pub async fn update_info(
        &self,
        member_id: i64,
        update: MemberUpdate,
    ) -> Result<Member, InternalError> {
        let mut member = self.load(member_id).await?;

        if let Some(name) = update.name {
            member.update_name(name);
        }
        if let Some(nick_name) = update.nick_name {
            member.update_nick_name(nick_name);
        }
        if let Some(age) = update.age {
            member.update_age(age);
        }

        self.member_store.save(&self.db, member).await
    }

    /// Change the password after checking the current one
    ///
    /// # Errors
    /// `MemberError::IncorrectPassword` when `current_password` does not match.
    pub async fn update_password(
        &self,
        member_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        let mut member = self.load(member_id).await?;

        if !member.match_password(self.password_encoder.as_ref(), current_password) {
            tracing::warn!(member_id, "Password change rejected: current password mismatch");
            return Err(MemberError::IncorrectPassword.into());
        }

        member.update_password(self.password_encoder.as_ref(), new_password)?;
        self.member_store.save(&self.db, member).await?;

        tracing::info!(member_id, "Password updated");
        Ok(())
    }

    /// Delete the member and everything it wrote, after checking its password
    pub async fn withdraw(&self, member_id: i64, password: &str) -> Result<(), InternalError> {
        let member = self.load(member_id).await?;

        if !member.match_password(self.password_encoder.as_ref(), password) {
            tracing::warn!(member_id, "Withdrawal rejected: password mismatch");
            return Err(MemberError::IncorrectPassword.into());
        }

        self.member_store.delete(&self.db, &member).await?;

        tracing::info!(member_id, "Member withdrew");
        Ok(())
    }

    /// Verify credentials and open a refresh-token session
    ///
    /// # Arguments
    /// * `username` - Login name
    /// * `password` - Raw password, checked against the stored hash
    /// * `refresh_token` - Token issued by the caller, recorded on the member
    ///
    /// # Returns
    /// * `Ok(Member)` - The member with its session recorded
    /// * `Err(InternalError::Login(BadCredentials))` - Unknown username or wrong password;
    ///   callers cannot tell which
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        refresh_token: &str,
    ) -> Result<Member, InternalError> {
        let Some(mut member) = self.member_store.find_by_username(&self.db, username).await? else {
            tracing::warn!(username, "Login rejected: unknown username");
            return Err(LoginError::bad_credentials());
        };

        if !member.match_password(self.password_encoder.as_ref(), password) {
            tracing::warn!(username, "Login rejected: password mismatch");
            return Err(LoginError::bad_credentials());
        }

        member.update_refresh_token(refresh_token);
        let member = self.member_store.save(&self.db, member).await?;

        tracing::info!(member_id = ?member.id(), "Refresh token session opened");
        Ok(member)
    }

    /// Close the refresh-token session of `username`
    pub async fn logout(&self, username: &str) -> Result<(), InternalError> {
        let mut member = self
            .member_store
            .find_by_username(&self.db, username)
            .await?
            .ok_or_else(|| LoginError::principal_not_found(username))?;

        member.destroy_refresh_token();
        self.member_store.save(&self.db, member).await?;

        tracing::info!(username, "Refresh token session closed");
        Ok(())
    }

    /// Member whose open session holds `refresh_token`
    pub async fn member_for_refresh_token(&self, refresh_token: &str) -> Result<Member, InternalError> {
        self.member_store
            .find_by_refresh_token(&self.db, refresh_token)
            .await?
            .ok_or_else(|| LoginError::UnknownRefreshToken.into())
    }

    async fn load(&self, member_id: i64) -> Result<Member, InternalError> {
        self.member_store
            .find_by_id(&self.db, member_id)
            .await?
            .ok_or_else(|| MemberError::member_not_found(member_id))
    }
}

#[cfg(test)]
#[path = "member_service_tests.rs"]
mod member_service_tests;
