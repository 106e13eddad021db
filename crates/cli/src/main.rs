//! ProLanding CLI - Database migrations and shop management.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! pl-cli migrate
//!
//! # Register a shop with a static token
//! pl-cli shop add -d your-store.myshopify.com -t shpat_xxx
//!
//! # Register a shop with refreshable client credentials
//! pl-cli shop add -d your-store.myshopify.com -t shpat_xxx \
//!     --client-id xxx --client-secret yyy
//!
//! # List configured shops
//! pl-cli shop list
//!
//! # Verify a shop's credentials against the Admin API
//! pl-cli shop test -d your-store.myshopify.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `shop add` - Register a shop credential record
//! - `shop list` - List configured shops
//! - `shop test` - Verify a shop's credentials with a live API call

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pl-cli")]
#[command(author, version, about = "ProLanding CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage shop credential records
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// Register a shop
    Add {
        /// Shop domain (e.g., your-store.myshopify.com)
        #[arg(short, long)]
        domain: String,

        /// Admin API access token
        #[arg(short, long)]
        token: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Seconds until the token expires (omit for long-lived tokens)
        #[arg(long)]
        expires_in: Option<i64>,

        /// OAuth client id for automatic token refresh
        #[arg(long)]
        client_id: Option<String>,

        /// OAuth client secret for automatic token refresh
        #[arg(long)]
        client_secret: Option<String>,
    },
    /// List configured shops
    List,
    /// Verify a shop's credentials with a live API call
    Test {
        /// Shop domain
        #[arg(short, long)]
        domain: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::admin().await?,
        Commands::Shop { action } => match action {
            ShopAction::Add {
                domain,
                token,
                name,
                expires_in,
                client_id,
                client_secret,
            } => {
                commands::shop::add(commands::shop::AddShop {
                    domain,
                    token,
                    name,
                    expires_in,
                    client_id,
                    client_secret,
                })
                .await?;
            }
            ShopAction::List => commands::shop::list().await?,
            ShopAction::Test { domain } => commands::shop::test(&domain).await?,
        },
    }
    Ok(())
}
