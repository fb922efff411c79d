use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{BootstrapSettings, EnvironmentProvider, SecretManager};
use crate::errors::InternalError;
use crate::services::{DelegatingPasswordEncoder, PasswordEncoder};
use crate::stores::{CommentStore, MemberStore, PostStore};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once at startup and shared through `Arc<AppData>`:
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ├─ db (DatabaseConnection, migrated)
///   ├─ password_encoder (Arc<dyn PasswordEncoder>, peppered)
///   ├─ member_store / post_store / comment_store
///   ↓ wrapped in Arc<AppData>
///   ├─ LoginService::new(app_data)
///   └─ MemberService::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub password_encoder: Arc<dyn PasswordEncoder>,
    pub member_store: Arc<MemberStore>,
    pub post_store: Arc<PostStore>,
    pub comment_store: Arc<CommentStore>,
}

impl AppData {
    pub fn new(db: DatabaseConnection, password_encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            db,
            password_encoder,
            member_store: Arc::new(MemberStore::new()),
            post_store: Arc::new(PostStore::new()),
            comment_store: Arc::new(CommentStore::new()),
        }
    }

    /// Initialize all application data
    ///
    /// The database should already be connected and migrated.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret loading fails
    pub fn init(
        db: DatabaseConnection,
        env_provider: &dyn EnvironmentProvider,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let secret_manager = SecretManager::init(env_provider)?;
        let password_encoder: Arc<dyn PasswordEncoder> = Arc::new(
            DelegatingPasswordEncoder::with_pepper(secret_manager.password_pepper()),
        );

        tracing::info!("AppData initialization complete");
        Ok(Self::new(db, password_encoder))
    }

    /// Connect, migrate and initialize from the given environment
    pub async fn bootstrap(
        settings: &BootstrapSettings,
        env_provider: &dyn EnvironmentProvider,
    ) -> Result<Self, InternalError> {
        let db = crate::config::init_database(settings).await?;
        Self::init(db, env_provider)
    }
}
