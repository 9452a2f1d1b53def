//! Rollcall CLI - onboard users through identity, roles and fingerprint enrollment

mod commands;
mod config;
mod http;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rollcall_core::{IdentityForm, Role};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::store::FileStore;

/// Rollcall - User onboarding and biometric enrollment
#[derive(Parser)]
#[command(name = "rollcall", version, about)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a user's identity and print the role selection address
    Capture {
        /// Full name (at least 2 characters)
        #[arg(long)]
        fullname: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// School ID (at least 2 characters)
        #[arg(long = "sch-id")]
        sch_id: String,
    },

    /// Assign roles and print the enrollment address
    AssignRoles {
        /// Role selection address from `capture`
        address: String,

        /// Role to toggle (Student, Lecturer, QA_Admin, Course_Admin); repeatable
        #[arg(long = "role", value_name = "ROLE")]
        roles: Vec<Role>,
    },

    /// Bind the user's fingerprint
    Enroll {
        /// Enrollment address from `assign-roles`
        address: String,
    },

    /// Show the locally recorded enrollment
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli).await;

    if let Err(e) = &result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Capture {
            fullname,
            email,
            sch_id,
        } => commands::capture::run(IdentityForm::new(fullname, email, sch_id), cli.json),

        Commands::AssignRoles { address, roles } => {
            commands::roles::run(address, roles, cli.json)
        }

        Commands::Enroll { address } => commands::enroll::run(&cli.config, address, cli.json).await,

        Commands::Status => {
            let store = FileStore::open(cli.config.store_path()?);
            commands::status::run(&store, cli.json)
        }
    }
}
