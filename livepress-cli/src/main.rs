//! # livepress CLI
//!
//! Serves a directory of markdown posts, picking up edits without a restart.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "livepress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "config/config.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the blog, updating as posts change on disk
    Serve {
        /// Server port (overrides server.port in the config)
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// List the posts that would be published
    List {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!("Using config file {:?}", cli.config);

    match cli.command {
        Commands::Serve { port } => commands::serve(&cli.config, port).await,
        Commands::List { json } => commands::list_posts(&cli.config, json),
    }
}
