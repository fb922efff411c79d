use clap::Parser;

use blog_membership::cli::{execute_command, Cli};
use blog_membership::config::{init_logging, BootstrapSettings, LoggingConfig, SystemEnvironment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env_provider = SystemEnvironment;
    init_logging(&LoggingConfig::from_env_provider(&env_provider))?;

    let settings = BootstrapSettings::from_env_provider(&env_provider)?;
    tracing::debug!(?settings, "Bootstrap settings loaded");

    let cli = Cli::parse();
    execute_command(cli, &settings, &env_provider).await
}
