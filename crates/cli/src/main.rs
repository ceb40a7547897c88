//! Marché CLI - inspect and edit a shopper's stores from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the local shopper's cart
//! marche --data-dir .marche cart show
//!
//! # Add two units of a product described in a YAML file
//! marche cart add --product catalog/savon-noir.yaml --quantity 2
//!
//! # Set a line's quantity (0 or less removes it)
//! marche cart update savon-noir 5
//!
//! # Toggle a product in the wishlist for a specific shopper
//! marche --shopper 0b6f3c1e-8f7a-4c1b-9d2e-5a4b3c2d1e0f wishlist toggle --product p.json
//!
//! # Order totals
//! marche checkout
//! ```
//!
//! # Commands
//!
//! - `cart show|add|update|remove|clear` - Cart lines and totals
//! - `wishlist show|add|toggle|remove|clear` - Saved products
//! - `compare show|add|toggle|remove|clear` - Product comparison
//! - `checkout` - Subtotal, savings, shipping and total
//!
//! Results are printed as JSON on stdout; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marche_core::ShopperId;

mod commands;

/// Shopper used when `--shopper` is not given.
const LOCAL_SHOPPER: &str = "00000000-0000-0000-0000-000000000000";

#[derive(Parser)]
#[command(name = "marche")]
#[command(author, version, about = "Marché shopper state tools")]
struct Cli {
    /// Directory holding persisted shopper state
    #[arg(long, env = "MARCHE_DATA_DIR", default_value = ".marche")]
    data_dir: PathBuf,

    /// Shopper whose stores are used
    #[arg(long, env = "MARCHE_SHOPPER_ID", default_value = LOCAL_SHOPPER)]
    shopper: ShopperId,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage the product comparison
    Compare {
        #[command(subcommand)]
        action: CompareAction,
    },
    /// Show checkout totals for the cart
    Checkout,
}

/// Catalog files describing the product to act on.
#[derive(clap::Args)]
struct ProductArgs {
    /// Product file (YAML or JSON)
    #[arg(short, long)]
    product: PathBuf,

    /// Variant file (YAML or JSON)
    #[arg(short, long)]
    variant: Option<PathBuf>,
}

impl ProductArgs {
    async fn load(
        &self,
    ) -> Result<(marche_core::Product, Option<marche_core::Variant>), commands::CliError> {
        commands::catalog::load_item(&self.product, self.variant.as_deref()).await
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a product
    Add {
        #[command(flatten)]
        item: ProductArgs,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity; 0 or less removes the line
    Update {
        /// Line id (`productId` or `productId-variantId`)
        id: String,

        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Line id
        id: String,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add {
        #[command(flatten)]
        item: ProductArgs,
    },
    /// Save a product, or remove it if already saved
    Toggle {
        #[command(flatten)]
        item: ProductArgs,
    },
    /// Remove a saved entry
    Remove {
        /// Entry id (`productId` or `productId-variantId`)
        id: String,
    },
    /// Remove every saved entry
    Clear,
}

#[derive(Subcommand)]
enum CompareAction {
    /// Show compared products
    Show,
    /// Add a product
    Add {
        /// Product file (YAML or JSON)
        #[arg(short, long)]
        product: PathBuf,
    },
    /// Add a product, or remove it if already compared
    Toggle {
        /// Product file (YAML or JSON)
        #[arg(short, long)]
        product: PathBuf,
    },
    /// Remove a product
    Remove {
        /// Product id
        product_id: String,
    },
    /// Remove every product
    Clear,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs on stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marche=info,marche_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let shopper = commands::open_shopper(&cli.data_dir, cli.shopper)?;

    let output = match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&shopper),
            CartAction::Add { item, quantity } => {
                let (product, variant) = item.load().await?;
                commands::cart::add(&shopper, &product, variant.as_ref(), quantity)
            }
            CartAction::Update { id, quantity } => {
                commands::cart::update(&shopper, &id, quantity)
            }
            CartAction::Remove { id } => commands::cart::remove(&shopper, &id),
            CartAction::Clear => commands::cart::clear(&shopper),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&shopper),
            WishlistAction::Add { item } => {
                let (product, variant) = item.load().await?;
                commands::wishlist::add(&shopper, &product, variant.as_ref())
            }
            WishlistAction::Toggle { item } => {
                let (product, variant) = item.load().await?;
                commands::wishlist::toggle(&shopper, &product, variant.as_ref())
            }
            WishlistAction::Remove { id } => commands::wishlist::remove(&shopper, &id),
            WishlistAction::Clear => commands::wishlist::clear(&shopper),
        },
        Commands::Compare { action } => match action {
            CompareAction::Show => commands::compare::show(&shopper),
            CompareAction::Add { product } => {
                let product = commands::catalog::load_product(&product).await?;
                commands::compare::add(&shopper, &product)
            }
            CompareAction::Toggle { product } => {
                let product = commands::catalog::load_product(&product).await?;
                commands::compare::toggle(&shopper, &product)
            }
            CompareAction::Remove { product_id } => {
                commands::compare::remove(&shopper, &product_id)
            }
            CompareAction::Clear => commands::compare::clear(&shopper),
        },
        Commands::Checkout => commands::cart::checkout(&shopper),
    }?;

    commands::emit(&output)
}
