//! ContentScout CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP gateway
//! - `run`    — Run one campaign from the command line
//! - `status` — Show backend health and campaign counts

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "contentscout",
    about = "ContentScout — multi-agent content research pipeline",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one research campaign and print the report
    Run {
        /// Campaign name
        #[arg(long)]
        name: String,

        /// Research topic
        #[arg(long)]
        topic: String,

        /// Seed keywords (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Competitor URLs (repeatable)
        #[arg(short, long = "competitor")]
        competitors: Vec<String>,

        /// Target region code
        #[arg(long, default_value = "US")]
        region: String,

        /// Target language code
        #[arg(long, default_value = "en")]
        language: String,

        /// Persona the audience researcher should focus on
        #[arg(long)]
        persona_focus: Option<String>,
    },

    /// Show backend health and campaign counts
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Run {
            name,
            topic,
            keywords,
            competitors,
            region,
            language,
            persona_focus,
        } => {
            commands::run::run(
                name,
                topic,
                keywords,
                competitors,
                region,
                language,
                persona_focus,
            )
            .await?
        }
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
