//! clawdmetrics - Supabase session exchange and daily stats reporting
//!
//! # Subcommands
//! - `exchange-code <auth_code>`                         - trade an OAuth code for a session file
//! - `report-stats [--auth env|session] <n> <in> <out>`  - upsert today's usage counters
//! - `verify [--probe]`                                  - check URL / anon key configuration
//!
//! Every failure exits with status 1; success exits 0.

mod commands;

use clap::{Parser, Subcommand};
use clawdmetrics_core::{ClawdConfig, ClawdError, ErrorCategory, ProcessEnv, StatsAuthMode};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "clawdmetrics",
    version,
    about = "Supabase session exchange and daily usage stats reporting"
)]
struct Cli {
    /// Config file (TOML). Defaults to ~/.config/clawdmetrics/config.toml if present
    #[arg(long, global = true, env = "CLAWDMETRICS_CONFIG")]
    config: Option<String>,

    /// Debug logging on stderr (RUST_LOG also works)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Exchange an OAuth authorization code for a session and save it locally
    ExchangeCode {
        /// Authorization code from the OAuth redirect
        #[arg(value_name = "AUTH_CODE", num_args = 0..)]
        auth_code: Vec<String>,
    },

    /// Report interaction and token counters for today
    ReportStats {
        /// Credential source: `env` (SUPABASE_URL + SUPABASE_SERVICE_KEY) or
        /// `session` (session file + SUPABASE_SERVICE_KEY)
        #[arg(long, default_value_t = StatsAuthMode::Env)]
        auth: StatsAuthMode,

        /// <interaction_count> <input_tokens> <output_tokens>
        #[arg(num_args = 0.., allow_negative_numbers = true)]
        counters: Vec<String>,
    },

    /// Check the Supabase URL and anon key configuration
    Verify {
        /// Also call the leaderboard edge function once
        #[arg(long)]
        probe: bool,
    },
}

impl Commands {
    /// Failure context used in "Error <action>: ..." lines.
    fn action(&self) -> &'static str {
        match self {
            Commands::ExchangeCode { .. } => "exchanging code",
            Commands::ReportStats { .. } => "reporting stats",
            Commands::Verify { .. } => "verifying configuration",
        }
    }

    fn usage(&self) -> commands::Usage {
        match self {
            Commands::ExchangeCode { .. } => commands::exchange::USAGE,
            Commands::ReportStats { .. } => commands::stats::USAGE,
            Commands::Verify { .. } => commands::verify::USAGE,
        }
    }
}

// ============================================================================
// Error reporting
// ============================================================================

/// Clap errors exit 1 like every other failure; help and version exit 0.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Exit status for a failed run.
fn failure_exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ClawdError>()
        .map_or(1, ClawdError::exit_code)
}

fn report_error(err: &anyhow::Error, command: &Commands) {
    let Some(err) = err.downcast_ref::<ClawdError>() else {
        eprintln!("❌ Error {}: {:#}", command.action(), err);
        return;
    };

    match err.category() {
        ErrorCategory::Configuration => eprintln!("❌ Error: {}", err),
        ErrorCategory::Session => eprintln!("❌ Session error: {}", err),
        ErrorCategory::Remote => eprintln!("❌ Error {}: {}", command.action(), err),
        ErrorCategory::Transport => eprintln!("❌ {}", err),
    }
    for line in err.remediation() {
        eprintln!("   {}", line);
    }

    if let ClawdError::InvalidArgument(_) = err {
        command.usage().print();
    }
}

/// `-v` forces debug; otherwise `RUST_LOG` if set and valid, else warn.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = ClawdConfig::load(cli.config.as_deref()).map_err(ClawdError::from)?;
    tracing::debug!(url = %config.supabase_url(), session = %config.session.path, "Config loaded");

    match &cli.command {
        Commands::ExchangeCode { auth_code } => {
            commands::exchange::run(auth_code, &ProcessEnv, &config).await
        }
        Commands::ReportStats { auth, counters } => {
            commands::stats::run(*auth, counters, &ProcessEnv, &config).await
        }
        Commands::Verify { probe } => commands::verify::run(*probe, &ProcessEnv, &config).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Local env files are a convenience; real environment variables win.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e));
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = run(&cli).await {
        report_error(&e, &cli.command);
        std::process::exit(failure_exit_code(&e));
    }
}

// ============================================================================
// Tests
// ============================================================================
