//! MK Store CLI - Drive the storefront cart and checkout from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart
//! mk-cli cart add --id p1 --name "Widget" --price 10 --image x.png
//!
//! # Change a quantity (0 or less removes the line)
//! mk-cli cart update p1 5
//!
//! # Show the cart
//! mk-cli cart show
//!
//! # Price the cart for delivery to a city
//! mk-cli checkout quote --city القاهرة
//!
//! # Place the order
//! mk-cli checkout place --name "Sara" --email sara@example.com \
//!     --phone 01000000000 --address "12 Tahrir St" --city القاهرة
//! ```
//!
//! # Commands
//!
//! - `cart` - Add, update, remove, clear and show cart lines
//! - `shipping list` - List active shipping zones
//! - `checkout` - Quote and place orders
//!
//! Configuration comes from the environment; see
//! [`mk_store_storefront::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mk_store_core::PaymentMethod;

mod commands;

#[derive(Parser)]
#[command(name = "mk-cli")]
#[command(author, version, about = "MK Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the saved cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect shipping zones
    Shipping {
        #[command(subcommand)]
        action: ShippingAction,
    },
    /// Quote and place orders
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Image URL or path
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Set a line's quantity
    Update {
        /// Product ID
        id: String,

        /// New quantity (0 or less removes the line)
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Show cart lines and totals
    Show,
}

#[derive(Subcommand)]
enum ShippingAction {
    /// List active shipping zones
    List,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show subtotal, shipping and total for a city
    Quote {
        /// Delivery city
        #[arg(long)]
        city: String,
    },
    /// Submit the cart as an order
    Place {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// Delivery city
        #[arg(long)]
        city: String,

        /// Delivery instructions
        #[arg(long, default_value = "")]
        notes: String,

        /// Payment method (`cash_on_delivery`, `bank_transfer`)
        #[arg(long, default_value = "cash_on_delivery")]
        payment: PaymentMethod,
    },
}

fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mk_cli=info,mk_store_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add {
                id,
                name,
                price,
                image,
            } => commands::cart::add(&ctx, &id, &name, price, &image)?,
            CartAction::Update { id, quantity } => commands::cart::update(&ctx, &id, quantity),
            CartAction::Remove { id } => commands::cart::remove(&ctx, &id),
            CartAction::Clear => commands::cart::clear(&ctx),
            CartAction::Show => commands::cart::show(&ctx),
        },
        Commands::Shipping { action } => match action {
            ShippingAction::List => commands::shipping::list(&ctx)?,
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Quote { city } => commands::checkout::quote(&ctx, &city)?,
            CheckoutAction::Place {
                name,
                email,
                phone,
                address,
                city,
                notes,
                payment,
            } => {
                let form = mk_store_storefront::checkout::CheckoutForm {
                    name,
                    email,
                    phone,
                    address,
                    city,
                    notes,
                    payment_method: payment,
                };
                commands::checkout::place(&ctx, &form)?;
            }
        },
    }
    Ok(())
}
