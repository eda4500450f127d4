use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use depgrave::{
    classifier::{ScanOptions, Scanner, TokioDelay},
    config::Config,
    manifest::read_manifest,
    model::ScanSummary,
    output::{format_result_to_string, print_result, OutputFormat},
    registry::NpmRegistry,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const DEAD_FOUND: u8 = 2;
}

#[derive(Parser)]
#[command(name = "depgrave")]
#[command(
    author,
    version,
    about = "Find package.json dependencies that have not been released in a long time"
)]
struct Cli {
    /// Enable info-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a package.json for dead dependencies
    Scan {
        /// Path to package.json
        #[arg(default_value = "package.json")]
        path: PathBuf,

        /// Days without a release after which a dependency counts as dead
        #[arg(short, long)]
        threshold_days: Option<u32>,

        /// Pause between registry requests, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit with code 2 if any dead dependency is found
        #[arg(long)]
        fail_on_dead: bool,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

struct ScanArgs {
    path: PathBuf,
    options: ScanOptions,
    timeout: Duration,
    format: OutputFormat,
    output: Option<PathBuf>,
    fail_on_dead: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let config = Config::load().context("Failed to load config")?;

    match cli.command {
        Commands::Scan {
            path,
            threshold_days,
            delay_ms,
            format,
            output,
            fail_on_dead,
        } => {
            let format_str = format.unwrap_or_else(|| config.default_format.clone());
            let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;

            let mut options = config.scan_options();
            if let Some(days) = threshold_days {
                options.threshold_days = days;
            }
            if let Some(ms) = delay_ms {
                options.request_delay = Duration::from_millis(ms);
            }

            let args = ScanArgs {
                path,
                options,
                timeout: config.timeout(),
                format,
                output,
                fail_on_dead,
            };
            run_scan(args, &config).await
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_scan(args: ScanArgs, config: &Config) -> Result<u8> {
    let is_interactive = args.format == OutputFormat::Table && args.output.is_none();

    let manifest = read_manifest(&args.path)?;
    let all_names = manifest.dependency_names();
    let names = config.ignore.filter_packages(all_names.clone());

    let skipped = all_names.len() - names.len();
    if skipped > 0 {
        tracing::info!(skipped, "ignoring packages listed in config");
    }

    if is_interactive {
        println!("Scanning dependencies in {}...", args.path.display());
    }

    let summary = if names.is_empty() {
        ScanSummary::default()
    } else {
        let registry = NpmRegistry::new(args.timeout)?;
        let scanner = Scanner::new(registry, TokioDelay, args.options);
        let now = chrono::Utc::now();

        let progress = if is_interactive {
            let pb = ProgressBar::new(names.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let summary = scanner
            .scan_with_progress(names.as_slice(), now, |report| {
                if let Some(ref pb) = progress {
                    pb.set_message(report.name.clone());
                    pb.inc(1);
                }
            })
            .await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        summary
    };

    if let Some(path) = &args.output {
        let content = format_result_to_string(&summary, args.format)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Results written to: {}", path.display());
    } else {
        print_result(&summary, args.format)?;
    }

    if args.fail_on_dead && summary.has_dead() {
        Ok(exit_codes::DEAD_FOUND)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'depgrave config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
