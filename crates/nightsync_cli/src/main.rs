//! nightsync CLI
//!
//! Command-line driver for a Nightscout remote store.
//!
//! # Commands
//!
//! - `check` - Verify connectivity and credentials
//! - `fetch` - Pull glucose, carbs, temp targets, overrides or announcements
//! - `upload` - Push treatments, glucose, device status or a profile from a JSON file
//! - `delete` - Remove a carb, insulin or override treatment by creation time
//! - `classify` - Show the device-lifecycle classification of an event type

mod commands;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use commands::{DeleteKind, FetchKind, UploadKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Nightscout sync tools.
#[derive(Parser)]
#[command(name = "nightsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Nightscout base URL
    #[arg(global = true, short, long, env = "NIGHTSCOUT_URL")]
    url: Option<String>,

    /// Nightscout API secret
    #[arg(global = true, short, long, env = "NIGHTSCOUT_API_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the remote is reachable and accepts the secret
    Check,

    /// Fetch records and print them as JSON
    Fetch {
        /// What to fetch
        #[arg(value_enum)]
        kind: FetchKind,

        /// Only records at or after (glucose, announcements) or strictly
        /// after (others) this RFC 3339 time
        #[arg(long, value_parser = commands::parse_time)]
        since: Option<DateTime<Utc>>,
    },

    /// Upload records from a JSON file
    Upload {
        /// What to upload
        #[arg(value_enum)]
        kind: UploadKind,

        /// JSON file to read
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete the treatment created at an exact time
    Delete {
        /// What to delete
        #[arg(value_enum)]
        kind: DeleteKind,

        /// Creation time (RFC 3339)
        #[arg(long, value_parser = commands::parse_time)]
        at: DateTime<Utc>,
    },

    /// Show the lifecycle classification of an event type
    Classify {
        /// Event type tag, e.g. "Rewind" or "Site Change"
        event_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Check => {
            let client = commands::connect(cli.url, cli.secret)?;
            commands::check::run(&client, &mut stdout).await?;
        }
        Commands::Fetch { kind, since } => {
            let client = commands::connect(cli.url, cli.secret)?;
            commands::fetch::run(&client, kind, since, &mut stdout).await?;
        }
        Commands::Upload { kind, file } => {
            let client = commands::connect(cli.url, cli.secret)?;
            commands::upload::run(&client, kind, &file, &mut stdout).await?;
        }
        Commands::Delete { kind, at } => {
            let client = commands::connect(cli.url, cli.secret)?;
            commands::delete::run(&client, kind, at, &mut stdout).await?;
        }
        Commands::Classify { event_type } => {
            commands::classify::run(&event_type, &mut stdout)?;
        }
    }

    Ok(())
}
