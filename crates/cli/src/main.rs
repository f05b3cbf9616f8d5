//! Bloomcart CLI - demo shopping flow over the storefront core.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! bloom-cli shop
//!
//! # Build a cart
//! bloom-cli cart add 3 --qty 2
//! bloom-cli cart show
//!
//! # Apply the promotional code
//! bloom-cli coupon apply 7FOREVER
//!
//! # Check out (offline/simulated payment path)
//! bloom-cli checkout --name "Asha Rao" --phone 9876543210 \
//!     --address "12 Rose Lane" --city Bengaluru --postal-code 560001
//!
//! # List orders and follow one until it is delivered
//! bloom-cli orders
//! bloom-cli track loc_abc123_xyz
//! ```
//!
//! # Commands
//!
//! - `shop` - List the catalog
//! - `cart add|show|clear` - Manage the working cart
//! - `coupon apply|remove` - Manage the promotional code
//! - `checkout` - Place the order for the current cart
//! - `orders` - List orders (backend first, local fallback)
//! - `track` - Follow an order's status until terminal
//! - `cancel` - Cancel an order

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output goes to stdout by design.
#![allow(clippy::print_stdout)]

use bloomcart_storefront::config::StorefrontConfig;
use bloomcart_storefront::state::AppState;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bloom-cli")]
#[command(author, version, about = "Bloomcart demo shopping CLI")]
struct Cli {
    /// Act as this user id (omit for the guest shopper)
    #[arg(long, global = true)]
    user: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Shop,
    /// Manage the working cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the promotional code
    Coupon {
        #[command(subcommand)]
        action: CouponAction,
    },
    /// Place the order for the current cart
    Checkout {
        /// Recipient name
        #[arg(long)]
        name: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// City
        #[arg(long)]
        city: String,

        /// Postal code
        #[arg(long)]
        postal_code: String,
    },
    /// List orders (backend first, local fallback)
    Orders,
    /// Follow an order's status until it is terminal
    Track {
        /// Order id (server-issued or `loc_…`)
        order_id: String,
    },
    /// Cancel an order
    Cancel {
        /// Order id (server-issued or `loc_…`)
        order_id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product id from `shop`
        product_id: i64,

        /// Number of units
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Show the cart with totals
    Show,
    /// Empty the cart (also removes any coupon)
    Clear,
}

#[derive(Subcommand)]
enum CouponAction {
    /// Apply a promotional code
    Apply {
        /// The code (e.g. 7FOREVER)
        code: String,
    },
    /// Remove the applied code
    Remove,
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
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;
    let user = cli.user.map(bloomcart_core::UserId::new);

    match cli.command {
        Commands::Shop => commands::shop::list(&state).await?,
        Commands::Cart { action } => match action {
            CartAction::Add { product_id, qty } => {
                commands::cart::add(&state, user, product_id, qty).await?;
            }
            CartAction::Show => commands::cart::show(&state, user),
            CartAction::Clear => commands::cart::clear(&state, user),
        },
        Commands::Coupon { action } => match action {
            CouponAction::Apply { code } => commands::cart::apply_coupon(&state, user, &code),
            CouponAction::Remove => commands::cart::remove_coupon(&state, user),
        },
        Commands::Checkout {
            name,
            phone,
            address,
            city,
            postal_code,
        } => {
            commands::checkout::place(&state, user, name, phone, address, city, postal_code)
                .await?;
        }
        Commands::Orders => commands::orders::list(&state, user).await,
        Commands::Track { order_id } => commands::orders::track(&state, user, order_id).await?,
        Commands::Cancel { order_id } => commands::orders::cancel(&state, user, order_id).await?,
    }
    Ok(())
}
