//! HomeCook CLI
//!
//! Browse, buy and sell home-cooked food from the terminal.

use clap::{Args, Parser, Subcommand, ValueEnum};
use homecook_app::AppError;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{add_food, auth, checkout, foods, profile};
use context::AppContext;

/// HomeCook marketplace client
#[derive(Parser)]
#[command(name = "homecook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to homecook.toml in the usual places)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login(CredentialArgs),

    /// Create an account
    Register(CredentialArgs),

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List food categories
    Categories,

    /// List food for sale
    Foods {
        /// Only listings in this category
        #[arg(long, conflicts_with = "search")]
        category: Option<i64>,

        /// Only listings matching this term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one listing
    Food {
        /// Listing id
        id: i64,
    },

    /// Prepare payment for a listing
    Checkout {
        /// Listing id
        food_id: i64,

        /// Portions to buy
        #[arg(short, long, default_value = "1")]
        quantity: String,
    },

    /// Show or save contact details
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Put a dish up for sale
    AddFood(add_food::AddFoodArgs),
}

#[derive(Args)]
struct CredentialArgs {
    /// Account email
    #[arg(short, long)]
    email: String,

    /// Account password
    #[arg(short, long, env = "HOMECOOK_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the saved profile
    Show,

    /// Create or update the profile
    Save(profile::ProfileArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("homecook=debug,homecook_app=debug,homecook_api_client=debug,homecook_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli.config.as_deref(), cli.format)?;
    let format = cli.format;

    let result = match cli.command {
        Commands::Login(args) => auth::login(&ctx, args.email, args.password, format).await,
        Commands::Register(args) => auth::register(&ctx, args.email, args.password).await,
        Commands::Logout => auth::logout(&ctx).await,
        Commands::Whoami => auth::whoami(&ctx, format).await,
        Commands::Categories => foods::categories(&ctx, format).await,
        Commands::Foods { category, search } => {
            foods::list(&ctx, category, search.as_deref(), format).await
        }
        Commands::Food { id } => foods::detail(&ctx, id, format).await,
        Commands::Checkout { food_id, quantity } => {
            checkout::run(&ctx, food_id, &quantity, format).await
        }
        Commands::Profile { action } => match action {
            ProfileAction::Show => profile::show(&ctx, format).await,
            ProfileAction::Save(args) => profile::save(&ctx, args).await,
        },
        Commands::AddFood(args) => add_food::run(&ctx, args, format).await,
    };

    ctx.persist_cookies()?;
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(result) = e.downcast_ref::<AppError>().and_then(AppError::validation) {
                for error in result.errors() {
                    output::Status::error(&format!("{}: {}", error.field, error.message));
                }
            }
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
