use std::fmt;

use crate::config::errors::ConfigError;
use crate::config::EnvironmentProvider;

const PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";
const MIN_PEPPER_LENGTH: usize = 16;

/// Application secrets, loaded once at startup
pub struct SecretManager {
    password_pepper: String,
}

impl SecretManager {
    /// Load and validate every secret
    ///
    /// # Errors
    /// Returns `ConfigError` if a required secret is missing or too short
    pub fn init(env_provider: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let password_pepper = Self::load_secret(env_provider, PASSWORD_PEPPER, MIN_PEPPER_LENGTH)?;
        Ok(Self { password_pepper })
    }

    /// Pepper mixed into every password hash
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    fn load_secret(
        env_provider: &dyn EnvironmentProvider,
        name: &str,
        min_length: usize,
    ) -> Result<String, ConfigError> {
        let value = env_provider
            .get_var(name)
            .ok_or_else(|| ConfigError::MissingSecret { secret_name: name.to_string() })?;

        if value.len() < min_length {
            return Err(ConfigError::SecretTooShort {
                secret_name: name.to_string(),
                expected: min_length,
                actual: value.len(),
            });
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_init_loads_pepper() {
        let env = MockEnvironment::empty().with_var("PASSWORD_PEPPER", "test-pepper-for-unit-tests");

        let secrets = SecretManager::init(&env).unwrap();

        assert_eq!(secrets.password_pepper(), "test-pepper-for-unit-tests");
    }

    #[test]
    fn test_init_requires_pepper() {
        let result = SecretManager::init(&MockEnvironment::empty());

        assert!(matches!(
            result,
            Err(ConfigError::MissingSecret { ref secret_name }) if secret_name == "PASSWORD_PEPPER"
        ));
    }

    #[test]
    fn test_init_rejects_short_pepper() {
        let env = MockEnvironment::empty().with_var("PASSWORD_PEPPER", "short");

        let result = SecretManager::init(&env);

        match result {
            Err(ConfigError::SecretTooShort { expected, actual, .. }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 5);
            }
            other => panic!("Expected SecretTooShort, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_pepper() {
        let env = MockEnvironment::empty().with_var("PASSWORD_PEPPER", "test-pepper-for-unit-tests");
        let secrets = SecretManager::init(&env).unwrap();

        assert!(!format!("{:?}", secrets).contains("test-pepper"));
    }
}
