use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{BootstrapSettings, EnvironmentProvider};
use crate::services::LoginService;

/// Run the authentication lookup for `username` and render the credentials as JSON
///
/// The stored hash is never part of the output.
pub async fn lookup_member(
    settings: &BootstrapSettings,
    env_provider: &dyn EnvironmentProvider,
    username: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let app_data = Arc::new(AppData::bootstrap(settings, env_provider).await?);
    let login_service = LoginService::new(app_data);

    let credentials = login_service.load_user_by_username(username).await?;

    Ok(serde_json::to_string_pretty(&credentials)?)
}
