use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plotlyzt_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "plotlyzt")]
#[command(author, version, about = "The Plotlyzt landing page, in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.config/plotlyzt/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Scroll the page from top to bottom and print every signal change as JSON lines
    Trace {
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800)]
        height: u32,
        /// Pixels scrolled per frame
        #[arg(long, default_value_t = 80)]
        step: u32,
        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 50)]
        frame_ms: u64,
        /// Skip the intro instead of waiting for it
        #[arg(long)]
        skip_intro: bool,
        /// Keep tracing this long after reaching the bottom
        #[arg(long, default_value_t = 1000)]
        settle_ms: u64,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // The TUI owns the terminal, so it logs to a file
    let tui = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, tui)?;

    let config = Arc::new(config);
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Trace {
            width,
            height,
            step,
            frame_ms,
            skip_intro,
            settle_ms,
        }) => {
            let options = commands::trace::TraceOptions {
                width,
                height,
                step_px: step,
                frame_ms,
                skip_intro,
                settle_ms,
            };
            commands::trace::run(config, options).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(cli.config.as_deref(), force),
            ConfigAction::Path => commands::config::path(cli.config.as_deref()),
        },
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}
