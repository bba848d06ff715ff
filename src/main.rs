//! merge-gate - block PR merges until declared requirements are satisfied

use clap::{Parser, Subcommand};
use merge_gate::error::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;

use cli::{CheckOptions, run_check};

/// Exit code for a blocked merge (requirements not yet satisfied).
const EXIT_BLOCKED: i32 = 1;
/// Exit code for infrastructure failures (rate limit, transport).
const EXIT_INFRA: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "merge-gate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the merge gate for a pull request
    Check {
        /// Repository owner (user or organization)
        #[arg(long)]
        owner: String,

        /// Repository name
        #[arg(long)]
        repo: String,

        /// Pull request number
        #[arg(long)]
        pr: u64,

        /// GitHub API token (public repos work without one)
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Reference instant override, e.g. "2025-03-14" (defaults to now)
        #[arg(long)]
        reference: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Commands::Check {
        owner,
        repo,
        pr,
        token,
        reference,
    } = cli.command;

    let options = CheckOptions {
        owner,
        repo,
        pr,
        token,
        reference,
    };

    match run_check(&options).await {
        Ok(verdict) if verdict.can_merge() => {}
        Ok(verdict) => {
            eprintln!("{}", verdict.reasons.join("\n"));
            std::process::exit(EXIT_BLOCKED);
        }
        Err(e @ Error::RateLimited { .. }) => {
            eprintln!("merge-gate: evaluation inconclusive: {e}");
            std::process::exit(EXIT_INFRA);
        }
        Err(e) => {
            eprintln!("merge-gate: {e}");
            std::process::exit(EXIT_INFRA);
        }
    }
}
