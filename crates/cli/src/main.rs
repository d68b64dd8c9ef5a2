//! NetValue Shop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! nv-cli migrate
//!
//! # Create a user (the API has no sign-up endpoint)
//! nv-cli user create -e jane@netvalue.io -f Jane -l Doe -p 'correct horse'
//!
//! # Load products from a YAML file, replacing ones no cart references
//! nv-cli seed products fixtures/products.yaml --clear
//! ```
//!
//! # Environment Variables
//!
//! - `POSTGRES_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `POSTGRES_SSL_MODE` - libpq SSL mode (default: require)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nv-cli")]
#[command(author, version, about = "NetValue shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage shop users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database from files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Plaintext password (stored as an Argon2 hash)
        #[arg(short, long)]
        password: String,

        /// User role (`user`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load products from a YAML file
    Products {
        /// Path to the YAML file
        file: String,

        /// Delete products no cart references before inserting
        #[arg(long)]
        clear: bool,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                first_name,
                last_name,
                password,
                role,
            } => {
                commands::user::create(&email, &first_name, &last_name, &password, &role).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file, clear } => {
                commands::seed::products(&file, clear).await?;
            }
        },
    }
    Ok(())
}
