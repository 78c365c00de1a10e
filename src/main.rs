use clap::{Parser, Subcommand};
use docugenius::cli::commands::generate::GenerateOptions;
use docugenius::cli::signal::{FORCE_EXIT_CODE, watch_interrupts};
use docugenius::generator::CancellationFlag;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docugenius")]
#[command(version, about = "Generate docstrings for Python code with an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Config file (default: ./docugenius.toml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate docstrings for a Python file or directory
    Generate {
        #[arg(help = "Python file or directory to document")]
        input_path: PathBuf,

        #[arg(short, long, help = "Model: openai:gpt-4o, openai:gpt-4o-mini")]
        model: Option<String>,

        #[arg(
            short = 'd',
            long = "docstring-format",
            help = "Docstring format: google, numpy, sphinx"
        )]
        docstring_format: Option<String>,

        #[arg(short = 'r', long, help = "Do not document raised exceptions")]
        skip_raises: bool,

        #[arg(short = 'R', long, help = "Do not document return values")]
        skip_returns: bool,

        #[arg(short = 'e', long, help = "Do not include usage examples")]
        skip_examples: bool,

        #[arg(
            short,
            long,
            help = "Write results here instead of overwriting the input"
        )]
        output_path: Option<PathBuf>,

        #[arg(short, long, help = "Files processed concurrently")]
        jobs: Option<usize>,
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
    /// Write a default configuration file
    Init {
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
        eprintln!("\x1b[31mdocugenius encountered an unexpected error:\x1b[0m");
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
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Generate {
            input_path,
            model,
            docstring_format,
            skip_raises,
            skip_returns,
            skip_examples,
            output_path,
            jobs,
        } => {
            let options = GenerateOptions {
                input: input_path,
                output: output_path,
                model,
                docstring_format,
                skip_raises,
                skip_returns,
                skip_examples,
                jobs,
                config_path: cli.config.clone(),
                quiet: cli.quiet,
            };

            let rt = Runtime::new()?;
            let summary = rt.block_on(async {
                let cancel = CancellationFlag::new();
                let flag = cancel.clone();
                tokio::spawn(watch_interrupts(tokio::signal::ctrl_c, flag, || {
                    std::process::exit(FORCE_EXIT_CODE);
                }));

                docugenius::cli::commands::generate::run(options, cancel).await
            })?;

            if summary.has_failures() || summary.cancelled() > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                docugenius::cli::commands::config::show(config_path, &format)?;
            }
            ConfigAction::Path => {
                docugenius::cli::commands::config::path(config_path)?;
            }
            ConfigAction::Init { force } => {
                docugenius::cli::commands::config::init(config_path, force)?;
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
