//! Nextrade CLI - Admin provisioning and lead export.
//!
//! # Usage
//!
//! ```bash
//! # Provision an admin (password from -p or ADMIN_PASSWORD)
//! nextrade-cli admin create -e admin@nextrade.com -n "Ops Admin"
//!
//! # Print every lead, newest first
//! nextrade-cli leads list
//!
//! # Export qualified leads matching "acme" to a file
//! nextrade-cli leads export -q acme -s qualified -o leads.csv
//! ```
//!
//! # Commands
//!
//! - `admin create` - Create an identity with the admin role claim
//! - `leads list` - Print the lead table
//! - `leads export` - Write the filtered lead table as CSV

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nextrade_core::LeadStatus;
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "nextrade-cli")]
#[command(author, version, about = "Nextrade operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin identities
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Read the lead table
    Leads {
        #[command(subcommand)]
        action: LeadsAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin identity
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Initial password
        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum LeadsAction {
    /// Print all leads, newest first
    List,
    /// Export leads as CSV
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only leads whose name, email or company contains this text
        #[arg(short = 'q', long = "search", default_value = "")]
        search: String,

        /// Only leads with this status
        #[arg(short, long)]
        status: Option<LeadStatus>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so exported CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, SecretString::from(password)).await?;
            }
        },
        Commands::Leads { action } => match action {
            LeadsAction::List => commands::leads::list().await?,
            LeadsAction::Export {
                output,
                search,
                status,
            } => commands::leads::export(output.as_deref(), &search, status).await?,
        },
    }
    Ok(())
}
