//! Storage Config

use clap::Args;

/// Order and catalog storage.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` URL; migrations are applied on startup
    #[arg(long = "database-url", env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}
