//! Libris CLI - Command-line client for the library catalog

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use libris_core::{ClientConfig, LibrisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Catalog API base URL (overrides LIBRIS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        location: Option<String>,

        /// Only available (true) or only reserved (false) copies
        #[arg(long)]
        available: Option<bool>,

        /// Look up cover images for the results
        #[arg(long)]
        covers: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the libraries books can be returned to
    Libraries,

    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List your reservations
    Reservations {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reserve a book copy
    Reserve {
        /// Copy id from the search results
        copy_id: i64,

        /// Lending period in days (1-28)
        #[arg(short, long, default_value = "7")]
        period: u32,

        /// Library the book will be returned to (defaults to your home library)
        #[arg(short, long)]
        return_library: Option<i64>,
    },

    /// Register a new account for librarian approval
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        address: String,

        /// Home library id
        #[arg(long)]
        library_id: i64,

        /// Member or Librarian
        #[arg(long, default_value = "Member")]
        role: String,
    },

    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Reset a password with the token from the reset email
    ResetPassword {
        #[arg(long)]
        token: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm: String,
    },

    /// Set the first password of an approved account
    SetPassword {
        #[arg(long)]
        token: Option<String>,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm: String,
    },

    /// List registrations waiting for approval (librarians)
    PendingUsers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Approve a pending registration (librarians)
    Approve {
        user_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "libris_cli=debug,libris_core=debug"
    } else {
        "libris_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    let client = LibrisClient::connect(&config).await?;

    match cli.command {
        Commands::Search {
            category,
            author,
            location,
            available,
            covers,
            json,
        } => {
            let filters = libris_core::SearchFilters {
                category,
                author,
                location,
                available,
            };
            commands::search(&client, filters, covers, json).await
        }

        Commands::Libraries => commands::libraries(&client).await,

        Commands::Login { email, password } => commands::login(&client, &email, &password).await,

        Commands::Logout => commands::logout(&client).await,

        Commands::Whoami => commands::whoami(&client),

        Commands::Reservations { json } => commands::reservations(&client, json).await,

        Commands::Reserve {
            copy_id,
            period,
            return_library,
        } => commands::reserve(&client, copy_id, period, return_library).await,

        Commands::Register {
            name,
            phone,
            email,
            address,
            library_id,
            role,
        } => {
            let form = libris_core::RegistrationForm {
                name,
                phone_number: phone,
                email,
                address,
                library_id,
                role: role.into(),
            };
            commands::register(&client, &form).await
        }

        Commands::ForgotPassword { email } => commands::forgot_password(&client, &email).await,

        Commands::ResetPassword {
            token,
            password,
            confirm,
        } => commands::reset_password(&client, &token, &password, &confirm).await,

        Commands::SetPassword {
            token,
            password,
            confirm,
        } => commands::set_password(&client, token.as_deref(), &password, &confirm).await,

        Commands::PendingUsers { json } => commands::pending_users(&client, json).await,

        Commands::Approve { user_id } => commands::approve(&client, user_id).await,
    }
}
