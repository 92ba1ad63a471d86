mod app;
mod commands;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flash10-cli", about = "Flash10 review scheduler CLI", version)]
struct Cli {
    /// Directory holding review data and config.json (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Record a word as mastered (creates or advances its review item)
    Master {
        /// The word, exactly as it should be tracked
        word: String,
        /// Card content as JSON (defaults to just the word)
        #[arg(long)]
        payload: Option<String>,
    },

    /// Record a failed review (resets the word to the first stage)
    Fail {
        /// The word to reset
        word: String,
    },

    /// List words that are due now
    Due,

    /// List every tracked word
    List,

    /// Show counts per stage and the next due time
    Stats,

    /// Stop tracking a word
    Remove {
        /// The word to remove
        word: String,
    },

    /// Keep running, report due words periodically and deliver reminders
    Watch {
        /// Seconds between due checks
        #[arg(long, default_value = "60")]
        every: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Master { word, payload } => {
            commands::master::run(&app, &word, payload.as_deref(), &cli.format)?;
        }
        Command::Fail { word } => {
            commands::fail::run(&app, &word, &cli.format)?;
        }
        Command::Due => {
            commands::due::run(&app, &cli.format, use_color)?;
        }
        Command::List => {
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Remove { word } => {
            commands::remove::run(&app, &word, &cli.format)?;
        }
        Command::Watch { every } => {
            commands::watch::run(&app, every).await?;
        }
    }

    Ok(())
}
