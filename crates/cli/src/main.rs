//! Movenpick CLI - order from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! movenpick menu --category local --max 5000
//!
//! # Fill the cart
//! movenpick cart add Burger
//! movenpick cart add "Chef's Special" --price 12000
//! movenpick cart inc 1
//! movenpick cart show
//!
//! # Place the order
//! movenpick checkout --full-name "Aline Uwase" --phone 0788123456 --address "KG 7 Ave" --payment cash
//! ```
//!
//! # Commands
//!
//! - `menu` - List and search the menu
//! - `cart` - Show and edit the cart
//! - `checkout` - Place the order
//! - `login`, `signup`, `logout`, `whoami` - Account
//! - `theme`, `language` - Preferences

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use movenpick_storefront::config::StorefrontConfig;
use movenpick_storefront::error::AppError;
use movenpick_storefront::notify::Notification;
use movenpick_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "movenpick")]
#[command(author, version, about = "Movenpick restaurant ordering")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the menu
    Menu(commands::menu::MenuArgs),
    /// Show or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart
    Checkout(commands::checkout::CheckoutArgs),
    /// Sign in
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Create an account
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Phone number
        #[arg(short, long, default_value = "")]
        phone: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show or set the colour theme (`light`, `dark`)
    Theme { value: Option<String> },
    /// Show or set the language (`en`, `fr`, `rw`, `sw`)
    Language { code: Option<String> },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add one unit of an item
    Add {
        /// Item name; priced from the menu unless --price is given
        name: String,

        /// Unit price in RWF
        #[arg(short, long)]
        price: Option<u64>,
    },
    /// Increase the quantity of a row
    Inc { row: usize },
    /// Decrease the quantity of a row (never below 1)
    Dec { row: usize },
    /// Remove a row
    Remove {
        row: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Empty the cart
    Clear,
    /// Print the number of items
    Count,
}

/// Initialize Sentry error tracking.
///
/// Returns a guard that must be kept alive for the duration of the program.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Owned(config.sentry.environment.clone())),
            sample_rate: config.sentry.sample_rate,
            traces_sample_rate: config.sentry.traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&AppError::from(e)),
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "movenpick_storefront=warn,movenpick_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let mut state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open session");
            fail(&AppError::Internal(e.to_string()))
        }
    };

    if let Err(e) = run(cli, &mut state).await {
        fail(&e);
    }
}

#[allow(clippy::print_stderr)]
fn fail(err: &AppError) -> ! {
    eprintln!("{}", Notification::from_error(err));
    std::process::exit(1);
}

async fn run(cli: Cli, state: &mut AppState) -> Result<(), AppError> {
    match cli.command {
        Commands::Menu(args) => commands::menu::list(state, &args)?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state)?,
            CartAction::Add { name, price } => commands::cart::add(state, &name, price)?,
            CartAction::Inc { row } => commands::cart::increment(state, row)?,
            CartAction::Dec { row } => commands::cart::decrement(state, row)?,
            CartAction::Remove { row, yes } => commands::cart::remove(state, row, yes)?,
            CartAction::Clear => commands::cart::clear(state),
            CartAction::Count => commands::cart::count(state),
        },
        Commands::Checkout(args) => commands::checkout::place_order(state, args).await?,
        Commands::Login { email } => commands::account::login(state, &email).await?,
        Commands::Signup { name, email, phone } => {
            commands::account::signup(state, name, email, phone).await?;
        }
        Commands::Logout => commands::account::logout(state)?,
        Commands::Whoami => commands::account::whoami(state),
        Commands::Theme { value } => commands::preferences::theme(state, value.as_deref())?,
        Commands::Language { code } => {
            commands::preferences::language(state, code.as_deref()).await?;
        }
    }
    Ok(())
}
