#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Operations CLI for the Rideway platform.
//!
//! Wraps the day-to-day tasks of running a deployment: creating the
//! database, loading demo data, and starting the API server.

mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rideway_cli", about = "Rideway platform operations tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database file and schema
    InitDb {
        /// Database file path (defaults to `RIDEWAY_DB_PATH`, then `data/rideway.db`)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Load demo accounts, rides, and incident data into the database
    Seed {
        /// Database file path (defaults to `RIDEWAY_DB_PATH`, then `data/rideway.db`)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Start the API server
    Serve,
}

fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        std::env::var(rideway_server::DB_PATH_ENV_VAR).map_or_else(
            |_| PathBuf::from(rideway_database::DEFAULT_DB_PATH),
            PathBuf::from,
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb { db } => {
            pretty_env_logger::init();
            let path = resolve_db_path(db);
            rideway_database::open_db(&path).await?;
            log::info!("Database ready at {}", path.display());
        }
        Commands::Seed { db } => {
            pretty_env_logger::init();
            let path = resolve_db_path(db);
            let db = rideway_database::open_db(&path).await?;
            seed::run(db.as_ref()).await?;
        }
        Commands::Serve => {
            // The server owns logger setup and uses actix-web's runtime,
            // so run it in a blocking task to avoid nesting runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(rideway_server::run_server())
            })
            .await??;
        }
    }

    Ok(())
}
