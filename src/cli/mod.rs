// CLI module for operational tasks against the membership database

pub mod lookup;

use clap::{Parser, Subcommand};

use crate::config::{self, BootstrapSettings, EnvironmentProvider};

/// Blog membership CLI
#[derive(Parser)]
#[command(name = "blog-membership")]
#[command(about = "Membership module of the blog backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Resolve a username the way the authentication layer does and print its authorities
    Lookup {
        /// Username to look up
        username: String,
    },
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
pub async fn execute_command(
    cli: Cli,
    settings: &BootstrapSettings,
    env_provider: &dyn EnvironmentProvider,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => {
            let db = config::connect_database(settings).await?;
            config::migrate_database(&db).await?;
            println!("Migrations applied to {}", settings.database_url());
        }
        Commands::Lookup { username } => {
            let output = lookup::lookup_member(settings, env_provider, &username).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
