use std::fmt;

use crate::config::errors::ConfigError;
use crate::config::EnvironmentProvider;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db?mode=rwc";

/// Infrastructure settings needed before anything else can start
pub struct BootstrapSettings {
    database_url: String,
}

impl BootstrapSettings {
    /// Load from the given environment
    ///
    /// `DATABASE_URL` falls back to a local SQLite file; any other backend than
    /// SQLite is rejected since it is the only driver compiled in.
    pub fn from_env_provider(env_provider: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env_provider
            .get_var("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        if !database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidDatabaseUrl(database_url));
        }

        Ok(Self { database_url })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .finish()
    }
}
