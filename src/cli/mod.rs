//! CLI module for the shopfront command-line interface.
//!
//! Provides subcommands for working against the storefront backend:
//! - `login` / `register` / `logout` - session lifecycle
//! - `whoami` - show the stored session
//! - `products list|show` - browse the catalog
//! - `product create|edit|delete|toggle` - manage the catalog (admin session)

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::StoreApi;
use crate::config::Config;
use crate::flow::{self, validation, AuthFlow, Catalog, ImageItem, SaveReport};
use crate::model::{Product, ProductDraft, Role};
use crate::session::SessionStore;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "shopfront")]
#[command(author, version, about = "A storefront client with role-aware sessions", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "shopfront.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Override the auth API base URL (login, signup, profile)
    #[arg(long, env = "SHOPFRONT_AUTH_URL")]
    pub auth_url: Option<String>,

    /// Override the store API base URL (products, images)
    #[arg(long, env = "SHOPFRONT_STORE_URL")]
    pub store_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Create an account and log straight into it
    Register {
        /// Display name for the new account
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password (minimum 6 characters)
        #[arg(long)]
        password: String,
    },

    /// Clear the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Catalog browsing commands
    #[command(subcommand)]
    Products(ProductsCommands),

    /// Catalog management commands (admin session required)
    #[command(subcommand)]
    Product(ProductCommands),
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommands {
    /// List the catalog
    List {
        /// Case-insensitive name filter, applied locally
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show details for one product
    Show {
        /// Product ID
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// Create a product, uploading and attaching its images
    Create(CreateProductArgs),

    /// Edit a product; omitted fields keep their current values
    Edit(EditProductArgs),

    /// Delete a product
    Delete {
        /// Product ID
        id: i64,
    },

    /// Flip a product between active and disabled
    Toggle {
        /// Product ID
        id: i64,
    },
}

/// Field flags for `product create`
#[derive(Args, Debug)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Price; unparseable input falls back to 0
    #[arg(long, default_value = "")]
    pub price: String,
    /// Stock count; unparseable input falls back to 0
    #[arg(long, default_value = "")]
    pub stock: String,
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub category: String,
    /// Image file to upload and attach (repeatable)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

/// Field flags for `product edit`; omitted flags keep the current values
#[derive(Args, Debug)]
pub struct EditProductArgs {
    /// Product ID
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Price; unparseable input falls back to 0
    #[arg(long)]
    pub price: Option<String>,
    /// Stock count; unparseable input falls back to 0
    #[arg(long)]
    pub stock: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// New image file to upload and attach (repeatable)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
    /// Detach an existing image by ID (repeatable)
    #[arg(long = "remove-image")]
    pub remove_images: Vec<i64>,
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Open the session store configured for this invocation
fn open_session(config: &Config) -> Result<Arc<SessionStore>> {
    let store = SessionStore::open(&config.session.data_dir)
        .context("Failed to open the session store")?;
    Ok(Arc::new(store))
}

/// Store API bound to the current session; any logged-in role may browse
fn store_api(config: &Config) -> Result<StoreApi> {
    let session = open_session(config)?;
    if !session.is_logged_in() {
        anyhow::bail!("Not logged in. Run 'shopfront login' first.");
    }
    Ok(StoreApi::new(&config.api, session)?)
}

/// Store API for catalog mutations; the stored session must be an admin
fn admin_store_api(config: &Config) -> Result<StoreApi> {
    let session = open_session(config)?;
    match session.session() {
        None => anyhow::bail!("Not logged in. Run 'shopfront login' first."),
        Some(active) if active.role != Role::Admin => {
            anyhow::bail!(
                "This command needs an admin session; {} is signed in as {}.",
                active.email,
                active.role
            );
        }
        Some(_) => Ok(StoreApi::new(&config.api, session)?),
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Login { email, password } => cmd_login(config, email, password).await,
        Commands::Register {
            name,
            email,
            password,
        } => cmd_register(config, name, email, password).await,
        Commands::Logout => cmd_logout(config),
        Commands::Whoami => cmd_whoami(config),
        Commands::Products(ProductsCommands::List { search }) => {
            cmd_products_list(config, search.as_deref()).await
        }
        Commands::Products(ProductsCommands::Show { id }) => {
            cmd_products_show(config, *id).await
        }
        Commands::Product(ProductCommands::Create(args)) => {
            cmd_product_create(config, args).await
        }
        Commands::Product(ProductCommands::Edit(args)) => cmd_product_edit(config, args).await,
        Commands::Product(ProductCommands::Delete { id }) => {
            cmd_product_delete(config, *id).await
        }
        Commands::Product(ProductCommands::Toggle { id }) => {
            cmd_product_toggle(config, *id).await
        }
    }
}

/// Log in and report which surface the role lands on
async fn cmd_login(config: &Config, email: &str, password: &str) -> Result<()> {
    let session = open_session(config)?;
    let auth = AuthFlow::new(config.api.clone(), session);

    let active = auth.login(email, password).await?;

    println!();
    println!("[OK] Logged in as {} ({})", active.email, active.role);
    match active.role {
        Role::Admin => {
            println!("Manage the catalog with 'shopfront product --help'.");
        }
        Role::User => {
            println!("Browse the catalog with 'shopfront products list'.");
        }
    }
    println!();
    Ok(())
}

/// Create an account, then establish the session like a login
async fn cmd_register(config: &Config, name: &str, email: &str, password: &str) -> Result<()> {
    let session = open_session(config)?;
    let auth = AuthFlow::new(config.api.clone(), session);

    let active = auth.register(name, email, password).await?;

    println!();
    println!("[OK] Account created for {}", active.email);
    println!("Logged in as {} ({})", active.name, active.role);
    match active.role {
        Role::Admin => {
            println!("Manage the catalog with 'shopfront product --help'.");
        }
        Role::User => {
            println!("Browse the catalog with 'shopfront products list'.");
        }
    }
    println!();
    Ok(())
}

/// Clear the stored session
fn cmd_logout(config: &Config) -> Result<()> {
    let session = open_session(config)?;
    let auth = AuthFlow::new(config.api.clone(), session);
    auth.logout()?;
    println!("Logged out.");
    Ok(())
}

/// Show the stored session
fn cmd_whoami(config: &Config) -> Result<()> {
    let session = open_session(config)?;
    match session.session() {
        Some(active) => {
            println!();
            println!("=== Session ===");
            println!();
            println!("Name:   {}", active.name);
            println!("Email:  {}", active.email);
            println!("Role:   {}", active.role);
            println!();
        }
        None => {
            println!("Not logged in. Run 'shopfront login' first.");
        }
    }
    Ok(())
}

/// List the catalog, optionally filtered by name
async fn cmd_products_list(config: &Config, search: Option<&str>) -> Result<()> {
    let store = store_api(config)?;
    let catalog = Catalog::load(&store)
        .await
        .context("Failed to fetch the catalog")?;
    let products = catalog.filter(search.unwrap_or(""));

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    // Print header
    println!();
    println!(
        "{:<6}  {:<24}  {:<14}  {:<12}  {:<10}  {:<6}  {:<8}",
        "ID", "NAME", "BRAND", "CATEGORY", "PRICE", "STOCK", "STATUS"
    );
    println!("{}", "-".repeat(92));

    // Print products
    for product in products {
        println!(
            "{:<6}  {:<24}  {:<14}  {:<12}  {:<10}  {:<6}  {:<8}",
            product.id,
            truncate(&product.name, 24),
            truncate(&product.brand, 14),
            truncate(&product.category, 12),
            format_price(product.price),
            product.stock,
            status_label(product),
        );
    }

    println!();
    Ok(())
}

/// Show details for a specific product
async fn cmd_products_show(config: &Config, id: i64) -> Result<()> {
    let store = store_api(config)?;
    let product = store
        .product(id)
        .await
        .context("Failed to fetch the product")?;

    println!();
    println!("=== Product: {} ===", product.name);
    println!();
    println!("ID:          {}", product.id);
    println!("Name:        {}", product.name);
    println!("Description: {}", product.description.as_deref().unwrap_or("-"));
    println!("Price:       {}", format_price(product.price));
    println!("Stock:       {}", product.stock);
    println!("Brand:       {}", product.brand);
    println!("Category:    {}", product.category);
    println!("Status:      {}", status_label(&product));

    if let Some(image) = &product.image {
        let name = image
            .image
            .as_ref()
            .and_then(|details| details.name.as_deref())
            .unwrap_or("-");
        println!("Image:       {} (id {})", name, image.id);
    }
    if let Some(created) = product.created_at {
        println!("Created:     {}", format_timestamp(created));
    }

    println!();
    Ok(())
}

/// Create a product and attach its images
async fn cmd_product_create(config: &Config, args: &CreateProductArgs) -> Result<()> {
    let store = admin_store_api(config)?;

    let draft = ProductDraft {
        name: args.name.clone(),
        description: args.description.clone(),
        price: validation::parse_price(&args.price),
        stock: validation::parse_stock(&args.stock),
        brand: args.brand.clone(),
        category: args.category.clone(),
    };
    let items: Vec<ImageItem> = args.images.iter().cloned().map(ImageItem::Local).collect();

    let report = flow::save_product(&store, &draft, items, None).await?;
    print_save_report(&report);
    Ok(())
}

/// Edit a product, keeping whatever fields and images the flags don't touch
async fn cmd_product_edit(config: &Config, args: &EditProductArgs) -> Result<()> {
    let store = admin_store_api(config)?;
    let current = store
        .product(args.id)
        .await
        .context("Failed to fetch the product")?;

    let draft = ProductDraft {
        name: args.name.clone().unwrap_or_else(|| current.name.clone()),
        description: args
            .description
            .clone()
            .unwrap_or_else(|| current.description.clone().unwrap_or_default()),
        price: args
            .price
            .as_deref()
            .map(validation::parse_price)
            .unwrap_or_else(|| current.price.unwrap_or(0.0)),
        stock: args
            .stock
            .as_deref()
            .map(validation::parse_stock)
            .unwrap_or(current.stock),
        brand: args.brand.clone().unwrap_or_else(|| current.brand.clone()),
        category: args
            .category
            .clone()
            .unwrap_or_else(|| current.category.clone()),
    };

    // The form carries the current image unless it was explicitly removed,
    // plus every new file. Whatever it no longer carries gets detached.
    let mut items: Vec<ImageItem> = Vec::new();
    if let Some(image) = &current.image {
        if !args.remove_images.contains(&image.id) {
            items.push(ImageItem::Existing(image.clone()));
        }
    }
    items.extend(args.images.iter().cloned().map(ImageItem::Local));

    let report = flow::save_product(&store, &draft, items, Some(&current)).await?;
    print_save_report(&report);
    Ok(())
}

/// Delete a product
async fn cmd_product_delete(config: &Config, id: i64) -> Result<()> {
    let store = admin_store_api(config)?;
    store
        .delete_product(id)
        .await
        .context("Failed to delete the product")?;
    println!("[OK] Deleted product {}", id);
    Ok(())
}

/// Flip a product's enabled flag
async fn cmd_product_toggle(config: &Config, id: i64) -> Result<()> {
    let store = admin_store_api(config)?;
    let product = store
        .product(id)
        .await
        .context("Failed to fetch the product")?;

    let updated = flow::toggle_product(&store, &product).await?;
    println!("[OK] Product {} is now {}", updated.id, status_label(&updated));
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Print the outcome of a save, including per-image failures
fn print_save_report(report: &SaveReport) {
    println!();
    if report.created {
        println!(
            "[OK] Created product {} (id {})",
            report.product.name, report.product.id
        );
    } else {
        println!(
            "[OK] Updated product {} (id {})",
            report.product.name, report.product.id
        );
    }

    if !report.attached.is_empty() {
        println!("Images attached: {}", report.attached.len());
    }
    for failure in &report.failed {
        println!(
            "  [!] {} was not attached: {}",
            failure.path.display(),
            failure.reason
        );
    }
    if !report.removed.is_empty() {
        println!("Images detached: {}", report.removed.len());
    }

    println!();
}

fn status_label(product: &Product) -> &'static str {
    if product.enabled.unwrap_or(true) {
        "active"
    } else {
        "disabled"
    }
}

fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("{:.2}", value),
        None => "-".to_string(),
    }
}

/// Format an epoch-milliseconds timestamp for display
fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Truncate a string to max length with ellipsis, counting chars so the
/// cut never lands inside a multi-byte character
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
