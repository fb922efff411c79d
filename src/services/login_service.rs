use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::internal::LoginError;
use crate::errors::InternalError;
use crate::stores::MemberStore;
use crate::types::internal::UserCredentials;

/// Authentication lookup: resolves a username into the credentials the
/// authentication layer verifies against. Read-only.
pub struct LoginService {
    db: DatabaseConnection,
    member_store: Arc<MemberStore>,
}

impl LoginService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            member_store: Arc::clone(&app_data.member_store),
        }
    }

    /// Load the credentials of the member registered as `username`
    ///
    /// # Returns
    /// * `Ok(UserCredentials)` - username, stored hash and the member's role authority
    /// * `Err(InternalError::Login(PrincipalNotFound))` - no member has that username
    /// * `Err(InternalError::Database(..))` - the lookup itself failed
    pub async fn load_user_by_username(&self, username: &str) -> Result<UserCredentials, InternalError> {
        let member = self
            .member_store
            .find_by_username(&self.db, username)
            .await?
            .ok_or_else(|| {
                tracing::debug!(username, "Principal lookup missed");
                LoginError::principal_not_found(username)
            })?;

        Ok(UserCredentials::from(&member))
    }
}
