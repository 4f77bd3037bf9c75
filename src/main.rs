use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sprintzero::cli::commands::analyze::{AnalyzeOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "sprintzero")]
#[command(
    version,
    about = "Change-impact analysis and Sprint-0 assessment for codebases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, env = "SPRINTZERO_CONFIG_FILE", help = "Use this config file instead of the global/project chain")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess the impact of a change request on a local checkout
    Analyze {
        #[arg(help = "Path to the checkout", required_unless_present = "input")]
        path: Option<PathBuf>,
        #[arg(long, conflicts_with = "path", help = "Prepared profiler input (JSON) instead of a checkout")]
        input: Option<PathBuf>,
        #[arg(long, short, help = "Change request title")]
        title: String,
        #[arg(long, short, help = "Change request description")]
        description: Option<String>,
        #[arg(long, conflicts_with = "description", help = "Read the description from a file")]
        description_file: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "summary",
            help = "Output format: json, summary"
        )]
        format: OutputFormat,
        #[arg(long, short, help = "Write the JSON report to this file")]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31msprintzero encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    // stdout carries the report; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            path,
            input,
            title,
            description,
            description_file,
            format,
            output,
        } => {
            sprintzero::cli::commands::analyze::run(AnalyzeOptions {
                path,
                input,
                title,
                description,
                description_file,
                format,
                output,
                config: cli.config,
                quiet: cli.quiet,
            })?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                sprintzero::cli::commands::config::show(global, cli.config.as_deref(), &format)?;
            }
            ConfigAction::Path => {
                sprintzero::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                sprintzero::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
