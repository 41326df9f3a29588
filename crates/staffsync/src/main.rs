use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use staffsync_core::db;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod review;

#[derive(Parser, Debug)]
#[command(author, version, about = "Staff directory bulk import CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations
    Migrate,
    /// Import a staff spreadsheet into a directory collection
    Import(commands::import::ImportArgs),
    /// Export a directory collection to a CSV file
    Export(commands::export::ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Migrate => {
            let pool = connect_pool().await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Ok(())
        }
        Command::Import(args) => {
            let pool = connect_pool().await?;
            commands::import::run(args, &pool).await
        }
        Command::Export(args) => {
            let pool = connect_pool().await?;
            commands::export::run(args, &pool).await
        }
    }
}

async fn connect_pool() -> Result<db::DbPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("STAFFSYNC_DATABASE_URL"))
        .context("DATABASE_URL (or STAFFSYNC_DATABASE_URL) must be set")?;
    db::connect(&database_url).await
}
