//! buzzdeck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "buzzdeck", version, about = "Timed reveal quiz trainer with LLM-generated study sets")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a study set from a file or a topic
    Generate {
        /// Source file (.txt, .md, or .pdf)
        #[arg(long, conflicts_with = "topic")]
        file: Option<PathBuf>,

        /// Topic to generate questions about
        #[arg(long)]
        topic: Option<String>,

        /// Title for the new study set
        #[arg(long)]
        title: String,

        /// Description for the new study set
        #[arg(long, default_value = "")]
        description: String,

        /// Model override (defaults to the configured model)
        #[arg(long)]
        model: Option<String>,
    },

    /// Manage study sets
    Sets {
        #[command(subcommand)]
        action: commands::sets::SetsAction,
    },

    /// Play a study set in timed reveal mode
    Play {
        /// Study set id (as shown by `buzzdeck sets list`)
        set_id: String,
    },

    /// Show completed game history
    History {
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show rating, accuracy, and study streak
    Stats,

    /// Show the current rating
    Rating,

    /// Show or update the local profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("buzzdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;
    let data_dir = cli.data_dir;

    let result = match cli.command {
        Commands::Generate {
            file,
            topic,
            title,
            description,
            model,
        } => {
            commands::generate::execute(file, topic, title, description, model, config, data_dir)
                .await
        }
        Commands::Sets { action } => commands::sets::execute(action, config, data_dir),
        Commands::Play { set_id } => commands::play::execute(set_id, config, data_dir).await,
        Commands::History { limit } => commands::history::execute(limit, config, data_dir),
        Commands::Stats => commands::stats::execute(config, data_dir),
        Commands::Rating => commands::stats::rating(config, data_dir),
        Commands::Profile { action } => commands::profile::execute(action, config, data_dir),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
